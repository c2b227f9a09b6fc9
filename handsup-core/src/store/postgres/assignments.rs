use async_trait::async_trait;
use sqlx::postgres::PgRow;

use super::{PostgresStore, column};
use crate::domain::{Assignment, AssignmentId, EventId, VolunteerId};
use crate::error::{CoreError, Result};
use crate::store::ports::AssignmentRepository;

fn map_assignment(row: &PgRow) -> Result<Assignment> {
    Ok(Assignment {
        id: AssignmentId(column(row, "id")?),
        volunteer_id: VolunteerId(column(row, "volunteer_id")?),
        event_id: EventId(column(row, "event_id")?),
        created_at: column(row, "created_at")?,
    })
}

#[async_trait]
impl AssignmentRepository for PostgresStore {
    async fn assign(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
    ) -> Result<Assignment> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO assignments (volunteer_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (volunteer_id, event_id)
                DO UPDATE SET volunteer_id = EXCLUDED.volunteer_id
            RETURNING id, volunteer_id, event_id, created_at
            "#,
        )
        .bind(volunteer_id.get())
        .bind(event_id.get())
        .fetch_one(self.pool())
        .await
        .map_err(|e| match CoreError::from(e) {
            CoreError::NotFound(_) => CoreError::not_found(format!(
                "volunteer {volunteer_id} or event {event_id}"
            )),
            other => other,
        })?;

        map_assignment(&row)
    }

    async fn list_all(&self) -> Result<Vec<Assignment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, volunteer_id, event_id, created_at
            FROM assignments
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_assignment).collect()
    }
}
