use async_trait::async_trait;
use sqlx::postgres::PgRow;

use super::volunteers::map_volunteer;
use super::{PostgresStore, column};
use crate::domain::{
    Account, AccountId, NewAccount, Role, Volunteer, VolunteerId,
};
use crate::error::{CoreError, Result};
use crate::store::ports::AccountRepository;

fn map_account(row: &PgRow) -> Result<Account> {
    let role: String = column(row, "role")?;
    Ok(Account {
        id: AccountId(column(row, "id")?),
        email: column(row, "email")?,
        password_hash: column(row, "password_hash")?,
        role: role.parse::<Role>()?,
        volunteer_id: VolunteerId(column(row, "volunteer_id")?),
        created_at: column(row, "created_at")?,
    })
}

#[async_trait]
impl AccountRepository for PostgresStore {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<(Account, Volunteer)> {
        let mut tx = self.pool().begin().await?;

        let profile = &account.profile;
        let skills: Vec<String> = profile.skills.iter().cloned().collect();
        let volunteer_row = sqlx::query(
            r#"
            INSERT INTO volunteers
                (name, location, skills, preferences, availability)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, location, skills, preferences, availability,
                updated_at
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.location)
        .bind(skills)
        .bind(&profile.preferences)
        .bind(&profile.availability)
        .fetch_one(&mut *tx)
        .await?;
        let volunteer = map_volunteer(&volunteer_row)?;

        // Dropping `tx` on the error path rolls the profile back.
        let account_row = sqlx::query(
            r#"
            INSERT INTO accounts (email, password_hash, role, volunteer_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, volunteer_id, created_at
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(volunteer.id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match CoreError::from(e) {
            CoreError::Conflict(_) => CoreError::Conflict(format!(
                "email {} is already registered",
                account.email
            )),
            other => other,
        })?;
        let created = map_account(&account_row)?;

        tx.commit().await?;
        Ok((created, volunteer))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, volunteer_id, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_account).transpose()
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, volunteer_id, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_account).transpose()
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM accounts")
            .fetch_one(self.pool())
            .await?;
        let total: i64 = column(&row, "total")?;
        Ok(total.max(0) as u64)
    }
}
