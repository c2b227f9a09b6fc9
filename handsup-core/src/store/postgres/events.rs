use async_trait::async_trait;
use sqlx::postgres::PgRow;

use super::{PostgresStore, column};
use crate::domain::{Event, EventDraft, EventId, Urgency};
use crate::error::Result;
use crate::store::ports::EventRepository;

fn map_event(row: &PgRow) -> Result<Event> {
    let skills: Vec<String> = column(row, "required_skills")?;
    let urgency: String = column(row, "urgency")?;
    Ok(Event {
        id: EventId(column(row, "id")?),
        name: column(row, "name")?,
        description: column(row, "description")?,
        location: column(row, "location")?,
        required_skills: skills.into_iter().collect(),
        date: column(row, "event_date")?,
        urgency: urgency.parse::<Urgency>()?,
        created_at: column(row, "created_at")?,
    })
}

fn skill_list(draft: &EventDraft) -> Vec<String> {
    draft.required_skills.iter().cloned().collect()
}

const INSERT_EVENT: &str = r#"
    INSERT INTO events
        (name, description, location, required_skills, event_date, urgency)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, name, description, location, required_skills, event_date,
        urgency, created_at
"#;

#[async_trait]
impl EventRepository for PostgresStore {
    async fn get(&self, id: EventId) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, location, required_skills,
                event_date, urgency, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_event).transpose()
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, location, required_skills,
                event_date, urgency, created_at
            FROM events
            ORDER BY event_date, id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_event).collect()
    }

    async fn create(&self, draft: EventDraft) -> Result<Event> {
        let row = sqlx::query(INSERT_EVENT)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.location)
            .bind(skill_list(&draft))
            .bind(draft.date)
            .bind(draft.urgency.as_str())
            .fetch_one(self.pool())
            .await?;

        map_event(&row)
    }

    async fn update(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            UPDATE events SET
                name = $2,
                description = $3,
                location = $4,
                required_skills = $5,
                event_date = $6,
                urgency = $7
            WHERE id = $1
            RETURNING id, name, description, location, required_skills,
                event_date, urgency, created_at
            "#,
        )
        .bind(id.get())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.location)
        .bind(skill_list(&draft))
        .bind(draft.date)
        .bind(draft.urgency.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_event).transpose()
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        // Assignments go with the event through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset(&self, drafts: Vec<EventDraft>) -> Result<Vec<Event>> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM assignments")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM events").execute(&mut *tx).await?;

        let mut events = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let row = sqlx::query(INSERT_EVENT)
                .bind(&draft.name)
                .bind(&draft.description)
                .bind(&draft.location)
                .bind(skill_list(draft))
                .bind(draft.date)
                .bind(draft.urgency.as_str())
                .fetch_one(&mut *tx)
                .await?;
            events.push(map_event(&row)?);
        }

        tx.commit().await?;

        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(events)
    }
}
