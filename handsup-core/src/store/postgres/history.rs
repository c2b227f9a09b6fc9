use async_trait::async_trait;
use sqlx::postgres::PgRow;

use super::{PostgresStore, column};
use crate::domain::{
    EventId, HistoryEntry, HistoryId, NewHistoryEntry, ParticipationStatus,
    VolunteerId,
};
use crate::error::{CoreError, Result};
use crate::store::ports::HistoryRepository;

fn map_entry(row: &PgRow) -> Result<HistoryEntry> {
    let status: String = column(row, "status")?;
    Ok(HistoryEntry {
        id: HistoryId(column(row, "id")?),
        volunteer_id: VolunteerId(column(row, "volunteer_id")?),
        event_id: EventId(column(row, "event_id")?),
        status: status.parse::<ParticipationStatus>()?,
        hours: column(row, "hours")?,
        recorded_at: column(row, "recorded_at")?,
    })
}

#[async_trait]
impl HistoryRepository for PostgresStore {
    async fn record(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        entry.validate()?;

        // The volunteer is checked by its foreign key, the event here.
        let row = sqlx::query(
            r#"
            INSERT INTO volunteer_history
                (volunteer_id, event_id, status, hours)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM events WHERE id = $2)
            RETURNING id, volunteer_id, event_id, status, hours, recorded_at
            "#,
        )
        .bind(entry.volunteer_id.get())
        .bind(entry.event_id.get())
        .bind(entry.status.as_str())
        .bind(entry.hours)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| match CoreError::from(e) {
            CoreError::NotFound(_) => CoreError::not_found(format!(
                "volunteer {}",
                entry.volunteer_id
            )),
            other => other,
        })?;

        match row {
            Some(row) => map_entry(&row),
            None => Err(CoreError::not_found(format!(
                "event {}",
                entry.event_id
            ))),
        }
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, volunteer_id, event_id, status, hours, recorded_at
            FROM volunteer_history
            WHERE volunteer_id = $1
            ORDER BY recorded_at DESC, id DESC
            "#,
        )
        .bind(volunteer_id.get())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_entry).collect()
    }
}
