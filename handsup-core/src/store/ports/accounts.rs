use async_trait::async_trait;

use crate::domain::{Account, AccountId, NewAccount, Volunteer};
use crate::error::Result;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create credentials and their volunteer profile in one atomic write.
    /// A taken email is a `Conflict` and leaves no profile behind.
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<(Account, Volunteer)>;

    /// Lookup by normalized (lower-case) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn get(&self, id: AccountId) -> Result<Option<Account>>;

    async fn count(&self) -> Result<u64>;
}
