mod common;

use chrono::{Duration, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tech_events_api::{
    db::{ConstraintKind, DbError},
    enums::{
        City, EventCategory, EventStatus, EventType, NotificationType, RegistrationStatus,
        UserRole,
    },
    models::{NewEvent, NewNotification, NewUser},
    services::{
        EventService, NotificationService, Page, RegistrationService, UserService,
        event_service::EventFilter,
    },
};
use uuid::Uuid;

fn new_event(title: &str, city: City, start: NaiveDateTime) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: "Hands-on session".to_string(),
        category: EventCategory::Cybersecurity,
        event_type: EventType::Workshop,
        status: EventStatus::Published,
        city,
        start_date: start,
        end_date: start + Duration::hours(4),
        max_participants: Some(40),
        price: Some(Decimal::new(150_000, 2)),
        slug: Some(format!("event-{}", Uuid::new_v4().simple())),
        tags: vec!["security".to_string(), "ctf".to_string()],
    }
}

fn in_days(days: i64) -> NaiveDateTime {
    (Utc::now() + Duration::days(days)).naive_utc()
}

#[tokio::test]
async fn create_and_look_up_events() -> anyhow::Result<()> {
    let Some(url) = common::database_url() else {
        return Ok(());
    };
    let db = common::migrated_pool(&url, common::pool_settings(5, 5_000)).await?;
    let events = EventService::new(db.clone());

    let draft = new_event("Secure Coding", City::Annaba, in_days(10));
    let slug = draft.slug.clone().expect("slug");
    let created = events.create(draft).await?;
    assert_eq!(created.city, City::Annaba);
    assert_eq!(created.is_free, Some(false));
    assert_eq!(created.price, Some(Decimal::new(150_000, 2)));
    assert_eq!(created.current_participants, Some(0));
    assert_eq!(created.tags.as_deref(), Some(&["security".to_string(), "ctf".to_string()][..]));

    assert_eq!(events.find_by_id(created.id).await?.map(|e| e.id), Some(created.id));
    assert_eq!(events.find_by_slug(&slug).await?.map(|e| e.id), Some(created.id));
    assert!(events.find_by_slug("no-such-event").await?.is_none());

    let mut backwards = new_event("Backwards", City::Annaba, in_days(10));
    backwards.end_date = backwards.start_date - Duration::hours(1);
    assert!(matches!(
        events.create(backwards).await,
        Err(DbError::Validation(_))
    ));

    db.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn upcoming_events_are_filtered_and_ordered() -> anyhow::Result<()> {
    let Some(url) = common::database_url() else {
        return Ok(());
    };
    let db = common::migrated_pool(&url, common::pool_settings(5, 5_000)).await?;
    let events = EventService::new(db.clone());

    // A wilaya unlikely to collide with other tests' data.
    let city = City::Tamanrasset;
    let later = events.create(new_event("Later", city, in_days(30))).await?;
    let sooner = events.create(new_event("Sooner", city, in_days(5))).await?;
    let mut draft = new_event("Draft", city, in_days(6));
    draft.status = EventStatus::Draft;
    events.create(draft).await?;
    events.create(new_event("Past", city, in_days(-3))).await?;

    let filter = EventFilter {
        city: Some(city),
        category: Some(EventCategory::Cybersecurity),
    };
    let listed = events.list_upcoming(filter, Page::new(Some(1), Some(100))).await?;
    let ids: Vec<Uuid> = listed.iter().map(|e| e.id).collect();
    let sooner_at = ids.iter().position(|id| *id == sooner.id).expect("sooner listed");
    let later_at = ids.iter().position(|id| *id == later.id).expect("later listed");
    assert!(sooner_at < later_at);
    assert!(listed.iter().all(|e| e.status == Some(EventStatus::Published)));
    assert!(listed.iter().all(|e| e.city == city));
    assert!(listed.iter().all(|e| e.start_date > Utc::now().naive_utc()));

    let other_category = EventFilter {
        city: Some(city),
        category: Some(EventCategory::Fintech),
    };
    let listed = events.list_upcoming(other_category, Page::default()).await?;
    assert!(listed.iter().all(|e| e.category == EventCategory::Fintech));

    db.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn registrations_and_notifications() -> anyhow::Result<()> {
    let Some(url) = common::database_url() else {
        return Ok(());
    };
    let db = common::migrated_pool(&url, common::pool_settings(5, 5_000)).await?;
    let users = UserService::new(db.clone());
    let events = EventService::new(db.clone());
    let registrations = RegistrationService::new(db.clone());
    let notifications = NotificationService::new(db.clone());

    let user = users
        .create(NewUser {
            email: common::unique_email("attendee"),
            password_hash: "hash".to_string(),
            first_name: "Yacine".to_string(),
            last_name: "Hamidi".to_string(),
            role: UserRole::User,
            city: None,
        })
        .await?;
    let event = events.create(new_event("Hack Night", City::Oran, in_days(3))).await?;

    let registration = registrations.register(event.id, user.id).await?;
    assert_eq!(registration.status, Some(RegistrationStatus::Pending));

    let err = registrations.register(event.id, user.id).await.err().expect("duplicate");
    assert!(matches!(
        err,
        DbError::ConstraintViolation { kind: ConstraintKind::Unique, .. }
    ));
    assert_eq!(err.constraint(), Some("registrations_event_id_user_id_key"));

    let confirmed = registrations
        .update_status(registration.id, RegistrationStatus::Confirmed)
        .await?
        .expect("registration");
    assert_eq!(confirmed.status, Some(RegistrationStatus::Confirmed));
    assert_eq!(
        registrations.find(event.id, user.id).await?.and_then(|r| r.status),
        Some(RegistrationStatus::Confirmed)
    );
    assert!(registrations
        .update_status(Uuid::new_v4(), RegistrationStatus::Cancelled)
        .await?
        .is_none());

    let err = registrations.register(event.id, Uuid::new_v4()).await.err().expect("fk");
    assert!(matches!(
        err,
        DbError::ConstraintViolation { kind: ConstraintKind::ForeignKey, .. }
    ));

    assert_eq!(notifications.unread_count(user.id).await?, 0);
    let first = notifications
        .create(NewNotification {
            user_id: user.id,
            kind: NotificationType::RegistrationConfirmed,
            title: "You're in".to_string(),
            message: "See you at Hack Night".to_string(),
            event_id: Some(event.id),
            data: None,
        })
        .await?;
    notifications
        .create(NewNotification {
            user_id: user.id,
            kind: NotificationType::EventReminder,
            title: "Reminder".to_string(),
            message: "Hack Night starts soon".to_string(),
            event_id: Some(event.id),
            data: Some(serde_json::json!({ "hours": 24 })),
        })
        .await?;

    assert_eq!(notifications.unread_count(user.id).await?, 2);
    assert_eq!(notifications.list_unread(user.id, 10).await?.len(), 2);

    // another user cannot mark it read
    assert!(!notifications.mark_read(first.id, Uuid::new_v4()).await?);
    assert!(notifications.mark_read(first.id, user.id).await?);
    assert!(!notifications.mark_read(first.id, user.id).await?);

    let unread = notifications.list_unread(user.id, 10).await?;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].kind, NotificationType::EventReminder);
    assert_eq!(notifications.unread_count(user.id).await?, 1);

    db.shutdown().await;
    Ok(())
}
