use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;

use super::{PostgresStore, column};
use crate::domain::{
    EventId, NewNotice, Notice, NoticeId, NoticeKind, VolunteerId,
};
use crate::error::Result;
use crate::store::ports::NoticeRepository;

fn map_notice(row: &PgRow) -> Result<Notice> {
    let event_id: Option<i64> = column(row, "event_id")?;
    let kind: String = column(row, "kind")?;
    Ok(Notice {
        id: NoticeId(column(row, "id")?),
        volunteer_id: VolunteerId(column(row, "volunteer_id")?),
        event_id: event_id.map(EventId),
        title: column(row, "title")?,
        body: column(row, "body")?,
        kind: kind.parse::<NoticeKind>()?,
        created_at: column(row, "created_at")?,
    })
}

#[async_trait]
impl NoticeRepository for PostgresStore {
    async fn insert(&self, notice: NewNotice) -> Result<Notice> {
        let row = sqlx::query(
            r#"
            INSERT INTO notices (volunteer_id, event_id, title, body, kind)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, volunteer_id, event_id, title, body, kind, created_at
            "#,
        )
        .bind(notice.volunteer_id.get())
        .bind(notice.event_id.map(EventId::get))
        .bind(&notice.title)
        .bind(&notice.body)
        .bind(notice.kind.as_str())
        .fetch_one(self.pool())
        .await?;

        map_notice(&row)
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Notice>> {
        let rows = sqlx::query(
            r#"
            SELECT id, volunteer_id, event_id, title, body, kind, created_at
            FROM notices
            WHERE volunteer_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(volunteer_id.get())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_notice).collect()
    }

    async fn find_recent(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
        since: DateTime<Utc>,
    ) -> Result<Option<Notice>> {
        let row = sqlx::query(
            r#"
            SELECT id, volunteer_id, event_id, title, body, kind, created_at
            FROM notices
            WHERE volunteer_id = $1
              AND event_id = $2
              AND created_at >= $3
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(volunteer_id.get())
        .bind(event_id.get())
        .bind(since)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_notice).transpose()
    }
}
