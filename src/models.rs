use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::enums::{
    City, EventCategory, EventStatus, EventType, NotificationType, RegistrationStatus, UserRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub city: Option<City>,
    pub preferred_language: Option<String>,
    pub timezone: Option<String>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub last_login_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub city: Option<City>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserFollow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: Option<NaiveDateTime>,
}

/// A stored credential. Only the hash of the secret is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub token_hash: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub expires_at: NaiveDateTime,
    pub used_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub kind: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: Option<EventStatus>,
    pub city: City,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub is_online: Option<bool>,
    pub meeting_link: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub timezone: Option<String>,
    pub registration_deadline: Option<NaiveDateTime>,
    pub max_participants: Option<i32>,
    pub current_participants: Option<i32>,
    pub is_registration_open: Option<bool>,
    pub is_free: Option<bool>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub cover_image: Option<String>,
    pub agenda: Option<Value>,
    pub requirements: Option<String>,
    pub what_to_bring: Option<String>,
    pub slug: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub view_count: Option<i32>,
    pub share_count: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_type: EventType,
    pub status: EventStatus,
    pub city: City,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub max_participants: Option<i32>,
    pub price: Option<Decimal>,
    pub slug: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: Option<RegistrationStatus>,
    pub registration_data: Option<Value>,
    pub special_requirements: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub checked_in_at: Option<NaiveDateTime>,
    pub checked_in_by: Option<Uuid>,
    pub qr_code: Option<String>,
    pub registered_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    pub data: Option<Value>,
    pub is_read: Option<bool>,
    pub read_at: Option<NaiveDateTime>,
    pub sent_via_email: Option<bool>,
    pub sent_via_push: Option<bool>,
    pub email_sent_at: Option<NaiveDateTime>,
    pub push_sent_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub data: Option<Value>,
}
