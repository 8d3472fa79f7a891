//! Time abstractions
//!
//! Cache freshness is computed from wall-clock milliseconds so envelopes stay
//! meaningful across restarts. [`MockClock`] lets tests move that clock
//! without sleeping.

mod clock;

pub use clock::{Clock, MockClock, SystemClock};
