use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{DbError, PoolManager},
    enums::{City, EventCategory, EventStatus},
    models::{Event, NewEvent},
    services::Page,
};

/// Optional filters for [`EventService::list_upcoming`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub city: Option<City>,
    pub category: Option<EventCategory>,
}

#[derive(Clone)]
pub struct EventService {
    db: Arc<PoolManager>,
}

impl EventService {
    pub fn new(db: Arc<PoolManager>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, DbError> {
        let mut conn = self.db.acquire().await?;
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(event)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, DbError> {
        let mut conn = self.db.acquire().await?;
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(event)
    }

    pub async fn create(&self, new_event: NewEvent) -> Result<Event, DbError> {
        validate_event(&new_event)?;

        let is_free = new_event.price.is_none_or(|p| p.is_zero());
        let mut conn = self.db.acquire().await?;
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                title, description, category, type, status, city,
                start_date, end_date, max_participants, is_free, price, slug, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new_event.title)
        .bind(new_event.description)
        .bind(new_event.category)
        .bind(new_event.event_type)
        .bind(new_event.status)
        .bind(new_event.city)
        .bind(new_event.start_date)
        .bind(new_event.end_date)
        .bind(new_event.max_participants)
        .bind(is_free)
        .bind(new_event.price)
        .bind(new_event.slug)
        .bind(new_event.tags)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(event_id = %event.id, city = %event.city, "event created");
        Ok(event)
    }

    /// Published events that have not started yet, soonest first.
    pub async fn list_upcoming(&self, filter: EventFilter, page: Page) -> Result<Vec<Event>, DbError> {
        let mut conn = self.db.acquire().await?;
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE status = $1
              AND start_date > $2
              AND ($3::city_enum IS NULL OR city = $3)
              AND ($4::event_category_enum IS NULL OR category = $4)
            ORDER BY start_date ASC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(EventStatus::Published)
        .bind(Utc::now().naive_utc())
        .bind(filter.city)
        .bind(filter.category)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;
        Ok(events)
    }
}

fn validate_event(event: &NewEvent) -> Result<(), DbError> {
    if event.title.trim().is_empty() {
        return Err(DbError::Validation("title must not be empty".into()));
    }
    if event.end_date <= event.start_date {
        return Err(DbError::Validation("end_date must be after start_date".into()));
    }
    if event.max_participants.is_some_and(|m| m <= 0) {
        return Err(DbError::Validation("max_participants must be positive".into()));
    }
    if event.price.is_some_and(|p| p.is_sign_negative()) {
        return Err(DbError::Validation("price must not be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;

    use super::*;
    use crate::enums::EventType;

    fn event() -> NewEvent {
        let start = NaiveDate::from_ymd_opt(2030, 3, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        NewEvent {
            title: "Rust Meetup".into(),
            description: "Monthly meetup".into(),
            category: EventCategory::WebDevelopment,
            event_type: EventType::Meetup,
            status: EventStatus::Published,
            city: City::Algiers,
            start_date: start,
            end_date: start + Duration::hours(3),
            max_participants: Some(80),
            price: None,
            slug: Some("rust-meetup".into()),
            tags: vec!["rust".into()],
        }
    }

    #[test]
    fn valid_event_passes() {
        assert!(validate_event(&event()).is_ok());
    }

    #[test]
    fn end_must_follow_start() {
        let mut e = event();
        e.end_date = e.start_date;
        assert!(matches!(validate_event(&e), Err(DbError::Validation(_))));
    }

    #[test]
    fn rejects_bad_capacity_and_price() {
        let mut e = event();
        e.max_participants = Some(0);
        assert!(validate_event(&e).is_err());

        let mut e = event();
        e.price = Some(Decimal::new(-100, 2));
        assert!(validate_event(&e).is_err());

        let mut e = event();
        e.title = "   ".into();
        assert!(validate_event(&e).is_err());
    }
}
