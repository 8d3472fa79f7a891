//! Integration tests for cache envelopes driven by a mock clock

use std::time::Duration;

use carelink_common::{CacheEnvelope, Clock, Liveness, MockClock};

const TTL: Duration = Duration::from_secs(40);

#[test]
fn envelope_written_now_expires_with_clock() {
    let clock = MockClock::new();
    let writer = clock.clone();

    let raw = CacheEnvelope::new(writer.millis_since_epoch(), vec!["c1", "c2"])
        .to_json()
        .expect("serializable payload");

    clock.advance(Duration::from_secs(39));
    let parsed: CacheEnvelope<Vec<String>> = CacheEnvelope::parse(&raw).expect("valid envelope");
    assert!(parsed.is_fresh(clock.millis_since_epoch(), TTL));

    clock.advance_millis(1_000);
    assert_eq!(parsed.into_fresh(clock.millis_since_epoch(), TTL), None);
}

#[test]
fn mock_clock_monotonic_and_wall_time_move_together() {
    let clock = MockClock::new();
    let instant = clock.now();
    let wall = clock.millis_since_epoch();

    clock.advance_millis(250);

    assert_eq!(clock.now() - instant, Duration::from_millis(250));
    assert_eq!(clock.millis_since_epoch() - wall, 250);
    assert_eq!(clock.elapsed(), Duration::from_millis(250));
}

#[test]
fn liveness_clones_observe_kill() {
    let owner = Liveness::new();
    let task = owner.clone();

    std::thread::spawn(move || owner.kill()).join().expect("thread");

    assert!(!task.is_live());
}
