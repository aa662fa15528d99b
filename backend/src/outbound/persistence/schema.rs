//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique, case-sensitive login name (max 150 characters).
        username -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        is_staff -> Bool,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per user, created alongside the account.
    user_profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        bio -> Text,
    }
}

diesel::table! {
    /// Per-day visit counters for the history page.
    user_history (id) {
        id -> Uuid,
        user_id -> Uuid,
        visit_date -> Date,
        visit_count -> Int4,
    }
}

diesel::table! {
    /// At most one row per user and day.
    login_activities (id) {
        id -> Uuid,
        user_id -> Uuid,
        login_date -> Date,
    }
}

diesel::table! {
    categories (id) {
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    eco_actions (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// Nulled when the category is deleted.
        category_id -> Nullable<Uuid>,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    uploads (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        description -> Text,
        category_id -> Nullable<Uuid>,
        /// Path relative to the media root.
        file_path -> Text,
        uploaded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Community events with a view counter.
    events (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        category_id -> Nullable<Uuid>,
        user_id -> Uuid,
        date -> Date,
        time -> Time,
        location -> Varchar,
        city -> Varchar,
        image_path -> Nullable<Text>,
        views -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    feedback (id) {
        id -> Uuid,
        user_id -> Uuid,
        comment -> Text,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    contact_messages (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        subject -> Varchar,
        message -> Text,
        sent_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per authenticated request.
    visits (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        ip_address -> Text,
        user_agent -> Text,
        visit_time -> Timestamptz,
    }
}

diesel::table! {
    search_logs (id) {
        id -> Uuid,
        query -> Varchar,
        searched_at -> Timestamptz,
        user_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    team_members (id) {
        id -> Uuid,
        name -> Varchar,
        role -> Varchar,
        bio -> Text,
        photo_path -> Nullable<Text>,
    }
}

diesel::table! {
    /// Singleton row keyed by `id = 1`.
    site_settings (id) {
        id -> Int2,
        footer_text -> Text,
        theme_color -> Varchar,
    }
}

diesel::joinable!(user_profiles -> users (user_id));
diesel::joinable!(user_history -> users (user_id));
diesel::joinable!(login_activities -> users (user_id));
diesel::joinable!(eco_actions -> categories (category_id));
diesel::joinable!(eco_actions -> users (user_id));
diesel::joinable!(uploads -> categories (category_id));
diesel::joinable!(uploads -> users (user_id));
diesel::joinable!(events -> categories (category_id));
diesel::joinable!(events -> users (user_id));
diesel::joinable!(feedback -> users (user_id));
diesel::joinable!(visits -> users (user_id));
diesel::joinable!(search_logs -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_profiles,
    user_history,
    login_activities,
    categories,
    eco_actions,
    uploads,
    events,
    feedback,
    contact_messages,
    visits,
    search_logs,
    team_members,
    site_settings,
);
