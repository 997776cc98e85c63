use super::{
    CheckDef, ColumnDef as C, ColumnDefault as D, ColumnType as T, ForeignKeyDef, IndexDef,
    IndexMethod, OnDelete, TableDef, UniqueDef,
};

const fn now(name: &'static str) -> C {
    C::new(name, T::Timestamp).default(D::CurrentTimestamp)
}

const fn cascade(name: &'static str, column: &'static str, references: &'static str) -> ForeignKeyDef {
    ForeignKeyDef {
        name,
        column,
        references,
        on_delete: OnDelete::Cascade,
    }
}

const fn weak(name: &'static str, column: &'static str, references: &'static str) -> ForeignKeyDef {
    ForeignKeyDef {
        name,
        column,
        references,
        on_delete: OnDelete::NoAction,
    }
}

const fn unique(name: &'static str, columns: &'static [&'static str]) -> UniqueDef {
    UniqueDef { name, columns }
}

const fn btree(name: &'static str, columns: &'static [&'static str]) -> IndexDef {
    IndexDef {
        name,
        method: IndexMethod::Btree,
        columns,
    }
}

const fn rating_check(name: &'static str, expr: &'static str) -> CheckDef {
    CheckDef { name, expr }
}

pub static USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        C::id(),
        C::new("email", T::Varchar(255)).not_null(),
        C::new("password_hash", T::Varchar(255)).not_null(),
        C::new("first_name", T::Varchar(100)).not_null(),
        C::new("last_name", T::Varchar(100)).not_null(),
        C::new("avatar", T::Text),
        C::new("role", T::Enum("user_role_enum")).default(D::Text("USER")),
        C::new("is_active", T::Boolean).default(D::Bool(true)),
        C::new("is_verified", T::Boolean).default(D::Bool(false)),
        C::new("bio", T::Text),
        C::new("phone_number", T::Varchar(20)),
        C::new("date_of_birth", T::Date),
        C::new("linkedin_url", T::Text),
        C::new("github_url", T::Text),
        C::new("website_url", T::Text),
        C::new("city", T::Enum("city_enum")),
        C::new("preferred_language", T::Varchar(10)).default(D::Text("fr")),
        C::new("timezone", T::Varchar(50)).default(D::Text("Africa/Algiers")),
        C::new("email_notifications", T::Boolean).default(D::Bool(true)),
        C::new("push_notifications", T::Boolean).default(D::Bool(true)),
        now("created_at"),
        now("updated_at"),
        C::new("last_login_at", T::Timestamp),
    ],
    foreign_keys: &[],
    uniques: &[unique("users_email_key", &["email"])],
    checks: &[],
    indexes: &[
        btree("idx_users_city", &["city"]),
        btree("idx_users_created_at", &["created_at"]),
        btree("idx_users_email", &["email"]),
        btree("idx_users_is_active", &["is_active"]),
        btree("idx_users_role", &["role"]),
    ],
};

pub static TOKENS: TableDef = TableDef {
    name: "tokens",
    columns: &[
        C::id(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("token_hash", T::Varchar(255)).not_null(),
        C::new("type", T::Varchar(50)).not_null(),
        C::new("expires_at", T::Timestamp).not_null(),
        C::new("used_at", T::Timestamp),
        now("created_at"),
    ],
    foreign_keys: &[cascade("tokens_user_id_fkey", "user_id", "users")],
    uniques: &[unique("tokens_token_hash_key", &["token_hash"])],
    checks: &[],
    indexes: &[
        btree("idx_tokens_hash", &["token_hash"]),
        btree("idx_tokens_user_type", &["user_id", "type"]),
    ],
};

pub static USER_INTERESTS: TableDef = TableDef {
    name: "user_interests",
    columns: &[
        C::id(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("category", T::Enum("event_category_enum")).not_null(),
        now("created_at"),
    ],
    foreign_keys: &[cascade("user_interests_user_id_fkey", "user_id", "users")],
    uniques: &[unique(
        "user_interests_user_id_category_key",
        &["user_id", "category"],
    )],
    checks: &[],
    indexes: &[btree("idx_user_interests_user_id", &["user_id"])],
};

pub static USER_FOLLOWS: TableDef = TableDef {
    name: "user_follows",
    columns: &[
        C::id(),
        C::new("follower_id", T::Uuid).not_null(),
        C::new("following_id", T::Uuid).not_null(),
        now("created_at"),
    ],
    foreign_keys: &[
        cascade("user_follows_follower_id_fkey", "follower_id", "users"),
        cascade("user_follows_following_id_fkey", "following_id", "users"),
    ],
    uniques: &[unique(
        "user_follows_follower_id_following_id_key",
        &["follower_id", "following_id"],
    )],
    checks: &[CheckDef {
        name: "user_follows_check",
        expr: "follower_id <> following_id",
    }],
    indexes: &[
        btree("idx_user_follows_follower", &["follower_id"]),
        btree("idx_user_follows_following", &["following_id"]),
    ],
};

pub static ORGANIZER_PROFILES: TableDef = TableDef {
    name: "organizer_profiles",
    columns: &[
        C::id(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("type", T::Enum("organizer_type_enum")).not_null(),
        C::new("name", T::Varchar(200)).not_null(),
        C::new("description", T::Text),
        C::new("logo", T::Text),
        C::new("website", T::Text),
        C::new("facebook_url", T::Text),
        C::new("twitter_url", T::Text),
        C::new("linkedin_url", T::Text),
        C::new("instagram_url", T::Text),
        C::new("contact_email", T::Varchar(255)),
        C::new("contact_phone", T::Varchar(20)),
        C::new("is_verified", T::Boolean).default(D::Bool(false)),
        C::new("verification_date", T::Timestamp),
        now("created_at"),
        now("updated_at"),
    ],
    foreign_keys: &[cascade("organizer_profiles_user_id_fkey", "user_id", "users")],
    uniques: &[],
    checks: &[],
    indexes: &[],
};

pub static EVENTS: TableDef = TableDef {
    name: "events",
    columns: &[
        C::id(),
        C::new("title", T::Varchar(200)).not_null(),
        C::new("description", T::Text).not_null(),
        C::new("category", T::Enum("event_category_enum")).not_null(),
        C::new("type", T::Enum("event_type_enum")).not_null(),
        C::new("status", T::Enum("event_status_enum")).default(D::Text("DRAFT")),
        C::new("city", T::Enum("city_enum")).not_null(),
        C::new("venue", T::Text),
        C::new("address", T::Text),
        C::new("is_online", T::Boolean).default(D::Bool(false)),
        C::new("meeting_link", T::Text),
        C::new("start_date", T::Timestamp).not_null(),
        C::new("end_date", T::Timestamp).not_null(),
        C::new("timezone", T::Varchar(50)).default(D::Text("Africa/Algiers")),
        C::new("registration_deadline", T::Timestamp),
        C::new("max_participants", T::Integer),
        C::new("current_participants", T::Integer).default(D::Int(0)),
        C::new("is_registration_open", T::Boolean).default(D::Bool(true)),
        C::new("is_free", T::Boolean).default(D::Bool(true)),
        C::new("price", T::Numeric { precision: 10, scale: 2 }),
        C::new("currency", T::Varchar(3)).default(D::Text("DZD")),
        C::new("cover_image", T::Text),
        C::new("agenda", T::Jsonb),
        C::new("requirements", T::Text),
        C::new("what_to_bring", T::Text),
        C::new("slug", T::Varchar(250)),
        C::new("tags", T::TextArray),
        C::new("is_featured", T::Boolean).default(D::Bool(false)),
        C::new("view_count", T::Integer).default(D::Int(0)),
        C::new("share_count", T::Integer).default(D::Int(0)),
        now("created_at"),
        now("updated_at"),
    ],
    foreign_keys: &[],
    uniques: &[unique("events_slug_key", &["slug"])],
    checks: &[],
    indexes: &[
        btree("idx_events_city_category", &["city", "category"]),
        btree("idx_events_created_at", &["created_at"]),
        btree("idx_events_is_featured", &["is_featured"]),
        btree("idx_events_slug", &["slug"]),
        btree("idx_events_start_date", &["start_date"]),
        btree("idx_events_status_start_date", &["status", "start_date"]),
        IndexDef {
            name: "idx_events_tags",
            method: IndexMethod::Gin,
            columns: &["tags"],
        },
        btree("idx_events_type", &["type"]),
    ],
};

pub static EVENT_ORGANIZERS: TableDef = TableDef {
    name: "event_organizers",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("organizer_id", T::Uuid).not_null(),
        C::new("role", T::Enum("collaboration_role_enum")).default(D::Text("CO_ORGANIZER")),
        C::new("is_primary", T::Boolean).default(D::Bool(false)),
        now("created_at"),
    ],
    foreign_keys: &[
        cascade("event_organizers_event_id_fkey", "event_id", "events"),
        cascade(
            "event_organizers_organizer_id_fkey",
            "organizer_id",
            "organizer_profiles",
        ),
    ],
    uniques: &[unique(
        "event_organizers_event_id_organizer_id_key",
        &["event_id", "organizer_id"],
    )],
    checks: &[],
    indexes: &[
        btree("idx_event_organizers_event", &["event_id"]),
        btree("idx_event_organizers_organizer", &["organizer_id"]),
    ],
};

pub static EVENT_COLLABORATORS: TableDef = TableDef {
    name: "event_collaborators",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("role", T::Enum("collaboration_role_enum")).not_null(),
        C::new("permissions", T::Jsonb),
        C::new("invited_by", T::Uuid),
        now("invited_at"),
        C::new("accepted_at", T::Timestamp),
        C::new("is_active", T::Boolean).default(D::Bool(true)),
    ],
    foreign_keys: &[
        cascade("event_collaborators_event_id_fkey", "event_id", "events"),
        cascade("event_collaborators_user_id_fkey", "user_id", "users"),
        weak("event_collaborators_invited_by_fkey", "invited_by", "users"),
    ],
    uniques: &[unique(
        "event_collaborators_event_id_user_id_role_key",
        &["event_id", "user_id", "role"],
    )],
    checks: &[],
    indexes: &[],
};

pub static REGISTRATIONS: TableDef = TableDef {
    name: "registrations",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("status", T::Enum("registration_status_enum")).default(D::Text("PENDING")),
        C::new("registration_data", T::Jsonb),
        C::new("special_requirements", T::Text),
        C::new("dietary_restrictions", T::Text),
        C::new("checked_in_at", T::Timestamp),
        C::new("checked_in_by", T::Uuid),
        C::new("qr_code", T::Text),
        now("registered_at"),
        now("updated_at"),
    ],
    foreign_keys: &[
        cascade("registrations_event_id_fkey", "event_id", "events"),
        cascade("registrations_user_id_fkey", "user_id", "users"),
        weak("registrations_checked_in_by_fkey", "checked_in_by", "users"),
    ],
    uniques: &[
        unique("registrations_event_id_user_id_key", &["event_id", "user_id"]),
        unique("registrations_qr_code_key", &["qr_code"]),
    ],
    checks: &[],
    indexes: &[
        btree("idx_registrations_event_status", &["event_id", "status"]),
        btree("idx_registrations_registered_at", &["registered_at"]),
        btree("idx_registrations_user_id", &["user_id"]),
    ],
};

pub static EVENT_BOOKMARKS: TableDef = TableDef {
    name: "event_bookmarks",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("user_id", T::Uuid).not_null(),
        now("created_at"),
    ],
    foreign_keys: &[
        cascade("event_bookmarks_event_id_fkey", "event_id", "events"),
        cascade("event_bookmarks_user_id_fkey", "user_id", "users"),
    ],
    uniques: &[unique(
        "event_bookmarks_event_id_user_id_key",
        &["event_id", "user_id"],
    )],
    checks: &[],
    indexes: &[btree("idx_event_bookmarks_user", &["user_id"])],
};

pub static NOTIFICATIONS: TableDef = TableDef {
    name: "notifications",
    columns: &[
        C::id(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("type", T::Enum("notification_type_enum")).not_null(),
        C::new("title", T::Varchar(200)).not_null(),
        C::new("message", T::Text).not_null(),
        C::new("event_id", T::Uuid),
        C::new("related_user_id", T::Uuid),
        C::new("data", T::Jsonb),
        C::new("is_read", T::Boolean).default(D::Bool(false)),
        C::new("read_at", T::Timestamp),
        C::new("sent_via_email", T::Boolean).default(D::Bool(false)),
        C::new("sent_via_push", T::Boolean).default(D::Bool(false)),
        C::new("email_sent_at", T::Timestamp),
        C::new("push_sent_at", T::Timestamp),
        now("created_at"),
    ],
    foreign_keys: &[
        cascade("notifications_user_id_fkey", "user_id", "users"),
        cascade("notifications_event_id_fkey", "event_id", "events"),
        cascade("notifications_related_user_id_fkey", "related_user_id", "users"),
    ],
    uniques: &[],
    checks: &[],
    indexes: &[
        btree("idx_notifications_created_at", &["created_at"]),
        btree("idx_notifications_type", &["type"]),
        btree("idx_notifications_user_unread", &["user_id", "is_read"]),
    ],
};

pub static BADGES: TableDef = TableDef {
    name: "badges",
    columns: &[
        C::id(),
        C::new("name", T::Varchar(100)).not_null(),
        C::new("description", T::Text).not_null(),
        C::new("icon", T::Text),
        C::new("color", T::Varchar(7)),
        C::new("type", T::Enum("badge_type_enum")).not_null(),
        C::new("criteria", T::Jsonb).not_null(),
        C::new("is_active", T::Boolean).default(D::Bool(true)),
        C::new("rarity_score", T::Integer).default(D::Int(1)),
        now("created_at"),
        now("updated_at"),
    ],
    foreign_keys: &[],
    uniques: &[unique("badges_name_key", &["name"])],
    checks: &[],
    indexes: &[],
};

pub static USER_BADGES: TableDef = TableDef {
    name: "user_badges",
    columns: &[
        C::id(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("badge_id", T::Uuid).not_null(),
        now("earned_at"),
        C::new("event_id", T::Uuid),
        C::new("reason", T::Text),
    ],
    foreign_keys: &[
        cascade("user_badges_user_id_fkey", "user_id", "users"),
        cascade("user_badges_badge_id_fkey", "badge_id", "badges"),
        weak("user_badges_event_id_fkey", "event_id", "events"),
    ],
    uniques: &[unique(
        "user_badges_user_id_badge_id_key",
        &["user_id", "badge_id"],
    )],
    checks: &[],
    indexes: &[],
};

pub static EVENT_MEDIA: TableDef = TableDef {
    name: "event_media",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("type", T::Enum("media_type_enum")).not_null(),
        C::new("url", T::Text).not_null(),
        C::new("filename", T::Varchar(255)),
        C::new("file_size", T::Integer),
        C::new("mime_type", T::Varchar(100)),
        C::new("title", T::Varchar(200)),
        C::new("description", T::Text),
        C::new("alt_text", T::Text),
        C::new("is_cover", T::Boolean).default(D::Bool(false)),
        C::new("sort_order", T::Integer).default(D::Int(0)),
        C::new("uploaded_by", T::Uuid),
        now("uploaded_at"),
    ],
    foreign_keys: &[
        cascade("event_media_event_id_fkey", "event_id", "events"),
        weak("event_media_uploaded_by_fkey", "uploaded_by", "users"),
    ],
    uniques: &[],
    checks: &[],
    indexes: &[],
};

pub static EVENT_FEEDBACK: TableDef = TableDef {
    name: "event_feedback",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("user_id", T::Uuid).not_null(),
        C::new("overall_rating", T::Integer),
        C::new("content_rating", T::Integer),
        C::new("organization_rating", T::Integer),
        C::new("venue_rating", T::Integer),
        C::new("comment", T::Text),
        C::new("suggestions", T::Text),
        C::new("is_public", T::Boolean).default(D::Bool(true)),
        C::new("is_anonymous", T::Boolean).default(D::Bool(false)),
        now("created_at"),
        now("updated_at"),
    ],
    foreign_keys: &[
        cascade("event_feedback_event_id_fkey", "event_id", "events"),
        cascade("event_feedback_user_id_fkey", "user_id", "users"),
    ],
    uniques: &[unique(
        "event_feedback_event_id_user_id_key",
        &["event_id", "user_id"],
    )],
    checks: &[
        rating_check(
            "event_feedback_overall_rating_check",
            "(overall_rating >= 1) AND (overall_rating <= 5)",
        ),
        rating_check(
            "event_feedback_content_rating_check",
            "(content_rating >= 1) AND (content_rating <= 5)",
        ),
        rating_check(
            "event_feedback_organization_rating_check",
            "(organization_rating >= 1) AND (organization_rating <= 5)",
        ),
        rating_check(
            "event_feedback_venue_rating_check",
            "(venue_rating >= 1) AND (venue_rating <= 5)",
        ),
    ],
    indexes: &[],
};

pub static EVENT_ANALYTICS: TableDef = TableDef {
    name: "event_analytics",
    columns: &[
        C::id(),
        C::new("event_id", T::Uuid).not_null(),
        C::new("date", T::Date).not_null(),
        C::new("views", T::Integer).default(D::Int(0)),
        C::new("registrations", T::Integer).default(D::Int(0)),
        C::new("cancellations", T::Integer).default(D::Int(0)),
        C::new("shares", T::Integer).default(D::Int(0)),
        C::new("bookmarks", T::Integer).default(D::Int(0)),
        C::new("direct_traffic", T::Integer).default(D::Int(0)),
        C::new("social_media_traffic", T::Integer).default(D::Int(0)),
        C::new("search_traffic", T::Integer).default(D::Int(0)),
        C::new("referral_traffic", T::Integer).default(D::Int(0)),
    ],
    foreign_keys: &[cascade("event_analytics_event_id_fkey", "event_id", "events")],
    uniques: &[unique(
        "event_analytics_event_id_date_key",
        &["event_id", "date"],
    )],
    checks: &[],
    indexes: &[],
};

/// Tables in creation order. Foreign keys are added after every table
/// exists, so the order only matters for readability of the DDL.
pub static TABLES: &[&TableDef] = &[
    &USERS,
    &TOKENS,
    &USER_INTERESTS,
    &USER_FOLLOWS,
    &ORGANIZER_PROFILES,
    &EVENTS,
    &EVENT_ORGANIZERS,
    &EVENT_COLLABORATORS,
    &REGISTRATIONS,
    &EVENT_BOOKMARKS,
    &NOTIFICATIONS,
    &BADGES,
    &USER_BADGES,
    &EVENT_MEDIA,
    &EVENT_FEEDBACK,
    &EVENT_ANALYTICS,
];
