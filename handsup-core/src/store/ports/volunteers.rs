use async_trait::async_trait;

use crate::domain::{ProfileDraft, Volunteer, VolunteerId};
use crate::error::Result;

#[async_trait]
pub trait VolunteerRepository: Send + Sync {
    async fn get(&self, id: VolunteerId) -> Result<Option<Volunteer>>;

    async fn list(&self) -> Result<Vec<Volunteer>>;

    /// Create a profile with a store-issued id.
    async fn create(&self, profile: ProfileDraft) -> Result<Volunteer>;

    /// Replace the profile stored under `id`, creating it when absent. Later
    /// store-issued ids never collide with an explicitly upserted one.
    async fn upsert(
        &self,
        id: VolunteerId,
        profile: ProfileDraft,
    ) -> Result<Volunteer>;
}
