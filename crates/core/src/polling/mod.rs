//! Bounded-retry polling for resources the backend produces asynchronously

mod poller;

pub use poller::{
    PollSnapshot, PollState, PollTarget, Poller, PollerConfig, PromptPoller, SessionPromptTarget,
};
