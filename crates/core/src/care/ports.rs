//! Port interfaces for the care endpoints

use async_trait::async_trait;
use carelink_domain::{
    DependentProfile, NewDependentProfile, NewSituationalSession, Result, SituationalSession,
};

/// Dependent ("child") profile endpoints
#[async_trait]
pub trait DependentApi: Send + Sync {
    async fn create(&self, profile: &NewDependentProfile) -> Result<DependentProfile>;

    /// All dependents visible to the signed-in user.
    async fn list(&self) -> Result<Vec<DependentProfile>>;

    async fn get(&self, id: &str) -> Result<DependentProfile>;
}

/// Situational session endpoints
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Create a session. The backend generates its prompt asynchronously.
    async fn create(&self, session: &NewSituationalSession) -> Result<SituationalSession>;

    async fn get(&self, id: &str) -> Result<SituationalSession>;

    /// Most recent session for a dependent, `None` when there is none.
    async fn latest_for_dependent(&self, dependent_id: &str) -> Result<Option<SituationalSession>>;
}
