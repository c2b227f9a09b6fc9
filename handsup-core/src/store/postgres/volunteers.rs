use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;

use super::{PostgresStore, column};
use crate::domain::{ProfileDraft, Volunteer, VolunteerId};
use crate::error::Result;
use crate::store::ports::VolunteerRepository;

pub(super) fn map_volunteer(row: &PgRow) -> Result<Volunteer> {
    let skills: Vec<String> = column(row, "skills")?;
    let availability: Vec<NaiveDate> = column(row, "availability")?;
    Ok(Volunteer {
        id: VolunteerId(column(row, "id")?),
        name: column(row, "name")?,
        location: column(row, "location")?,
        skills: skills.into_iter().collect(),
        preferences: column(row, "preferences")?,
        availability,
        updated_at: column(row, "updated_at")?,
    })
}

fn skill_list(profile: &ProfileDraft) -> Vec<String> {
    profile.skills.iter().cloned().collect()
}

#[async_trait]
impl VolunteerRepository for PostgresStore {
    async fn get(&self, id: VolunteerId) -> Result<Option<Volunteer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, location, skills, preferences, availability,
                updated_at
            FROM volunteers
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_volunteer).transpose()
    }

    async fn list(&self) -> Result<Vec<Volunteer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, location, skills, preferences, availability,
                updated_at
            FROM volunteers
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_volunteer).collect()
    }

    async fn create(&self, profile: ProfileDraft) -> Result<Volunteer> {
        let row = sqlx::query(
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
        .bind(skill_list(&profile))
        .bind(&profile.preferences)
        .bind(&profile.availability)
        .fetch_one(self.pool())
        .await?;

        map_volunteer(&row)
    }

    async fn upsert(
        &self,
        id: VolunteerId,
        profile: ProfileDraft,
    ) -> Result<Volunteer> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO volunteers
                (id, name, location, skills, preferences, availability)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                location = EXCLUDED.location,
                skills = EXCLUDED.skills,
                preferences = EXCLUDED.preferences,
                availability = EXCLUDED.availability,
                updated_at = NOW()
            RETURNING id, name, location, skills, preferences, availability,
                updated_at
            "#,
        )
        .bind(id.get())
        .bind(&profile.name)
        .bind(&profile.location)
        .bind(skill_list(&profile))
        .bind(&profile.preferences)
        .bind(&profile.availability)
        .fetch_one(&mut *tx)
        .await?;

        // Keep BIGSERIAL ahead of explicitly chosen ids.
        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('volunteers', 'id'),
                GREATEST((SELECT MAX(id) FROM volunteers), 1)
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        map_volunteer(&row)
    }
}
