//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Each row converts into its
//! domain entity and each insertable row borrows from one.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryId, ContactMessage, ContactMessageId, EcoAction, EcoActionId, Event,
    EventId, Feedback, FeedbackId, SearchLog, SearchLogId, SiteSettings, TeamMember,
    TeamMemberId, Upload, UploadId, User, UserHistory, UserHistoryId, UserId, UserProfile,
    UserProfileId, Visit, VisitId,
};

use super::schema::{
    categories, contact_messages, eco_actions, events, feedback, login_activities, search_logs,
    site_settings, team_members, uploads, user_history, user_profiles, users, visits,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_staff: row.is_staff,
            date_joined: row.date_joined,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            username: &user.username,
            email: &user.email,
            password_hash: &user.password_hash,
            is_staff: user.is_staff,
            date_joined: user.date_joined,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: String,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: UserProfileId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            bio: row.bio,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserHistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub visit_date: NaiveDate,
    pub visit_count: i32,
}

impl From<UserHistoryRow> for UserHistory {
    fn from(row: UserHistoryRow) -> Self {
        Self {
            id: UserHistoryId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            visit_date: row.visit_date,
            visit_count: row.visit_count,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = login_activities)]
pub(crate) struct NewLoginActivityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub login_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Categories, actions and uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::from_uuid(row.id),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = eco_actions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EcoActionRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<EcoActionRow> for EcoAction {
    fn from(row: EcoActionRow) -> Self {
        Self {
            id: EcoActionId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            category_id: row.category_id.map(CategoryId::from_uuid),
            user_id: UserId::from_uuid(row.user_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eco_actions)]
pub(crate) struct NewEcoActionRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a EcoAction> for NewEcoActionRow<'a> {
    fn from(action: &'a EcoAction) -> Self {
        Self {
            id: *action.id.as_uuid(),
            title: &action.title,
            description: &action.description,
            category_id: action.category_id.map(Uuid::from),
            user_id: *action.user_id.as_uuid(),
            created_at: action.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = uploads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UploadRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<UploadRow> for Upload {
    fn from(row: UploadRow) -> Self {
        Self {
            id: UploadId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            description: row.description,
            category_id: row.category_id.map(CategoryId::from_uuid),
            file_path: row.file_path,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = uploads)]
pub(crate) struct NewUploadRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category_id: Option<Uuid>,
    pub file_path: &'a str,
    pub uploaded_at: DateTime<Utc>,
}

impl<'a> From<&'a Upload> for NewUploadRow<'a> {
    fn from(upload: &'a Upload) -> Self {
        Self {
            id: *upload.id.as_uuid(),
            user_id: *upload.user_id.as_uuid(),
            title: &upload.title,
            description: &upload.description,
            category_id: upload.category_id.map(Uuid::from),
            file_path: &upload.file_path,
            uploaded_at: upload.uploaded_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub city: String,
    pub image_path: Option<String>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            category_id: row.category_id.map(CategoryId::from_uuid),
            user_id: UserId::from_uuid(row.user_id),
            date: row.date,
            time: row.time,
            location: row.location,
            city: row.city,
            image_path: row.image_path,
            views: row.views,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: &'a str,
    pub city: &'a str,
    pub image_path: Option<&'a str>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Event> for NewEventRow<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            title: &event.title,
            description: &event.description,
            category_id: event.category_id.map(Uuid::from),
            user_id: *event.user_id.as_uuid(),
            date: event.date,
            time: event.time,
            location: &event.location,
            city: &event.city,
            image_path: event.image_path.as_deref(),
            views: event.views,
            created_at: event.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Feedback and contact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: FeedbackId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            comment: row.comment,
            submitted_at: row.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub comment: &'a str,
    pub submitted_at: DateTime<Utc>,
}

impl<'a> From<&'a Feedback> for NewFeedbackRow<'a> {
    fn from(feedback: &'a Feedback) -> Self {
        Self {
            id: *feedback.id.as_uuid(),
            user_id: *feedback.user_id.as_uuid(),
            comment: &feedback.comment,
            submitted_at: feedback.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contact_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactMessageRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

impl From<ContactMessageRow> for ContactMessage {
    fn from(row: ContactMessageRow) -> Self {
        Self {
            id: ContactMessageId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            sent_at: row.sent_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contact_messages)]
pub(crate) struct NewContactMessageRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
    pub sent_at: DateTime<Utc>,
}

impl<'a> From<&'a ContactMessage> for NewContactMessageRow<'a> {
    fn from(message: &'a ContactMessage) -> Self {
        Self {
            id: *message.id.as_uuid(),
            name: &message.name,
            email: &message.email,
            subject: &message.subject,
            message: &message.message,
            sent_at: message.sent_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity logs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VisitRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub ip_address: String,
    pub user_agent: String,
    pub visit_time: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Self {
            id: VisitId::from_uuid(row.id),
            user_id: row.user_id.map(UserId::from_uuid),
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            visit_time: row.visit_time,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visits)]
pub(crate) struct NewVisitRow<'a> {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub ip_address: &'a str,
    pub user_agent: &'a str,
    pub visit_time: DateTime<Utc>,
}

impl<'a> From<&'a Visit> for NewVisitRow<'a> {
    fn from(visit: &'a Visit) -> Self {
        Self {
            id: *visit.id.as_uuid(),
            user_id: visit.user_id.map(Uuid::from),
            ip_address: &visit.ip_address,
            user_agent: &visit.user_agent,
            visit_time: visit.visit_time,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = search_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SearchLogRow {
    pub id: Uuid,
    pub query: String,
    pub searched_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

impl From<SearchLogRow> for SearchLog {
    fn from(row: SearchLogRow) -> Self {
        Self {
            id: SearchLogId::from_uuid(row.id),
            query: row.query,
            searched_at: row.searched_at,
            user_id: row.user_id.map(UserId::from_uuid),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = search_logs)]
pub(crate) struct NewSearchLogRow<'a> {
    pub id: Uuid,
    pub query: &'a str,
    pub searched_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

impl<'a> From<&'a SearchLog> for NewSearchLogRow<'a> {
    fn from(log: &'a SearchLog) -> Self {
        Self {
            id: *log.id.as_uuid(),
            query: &log.query,
            searched_at: log.searched_at,
            user_id: log.user_id.map(Uuid::from),
        }
    }
}

// ---------------------------------------------------------------------------
// Team and site settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeamMemberRow {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo_path: Option<String>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: TeamMemberId::from_uuid(row.id),
            name: row.name,
            role: row.role,
            bio: row.bio,
            photo_path: row.photo_path,
        }
    }
}

/// Used for both insert and full update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = team_members)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TeamMemberValues<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub bio: &'a str,
    pub photo_path: Option<&'a str>,
}

impl<'a> From<&'a TeamMember> for TeamMemberValues<'a> {
    fn from(member: &'a TeamMember) -> Self {
        Self {
            name: &member.name,
            role: &member.role,
            bio: &member.bio,
            photo_path: member.photo_path.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = site_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SiteSettingsRow {
    #[expect(dead_code, reason = "singleton key is always 1")]
    pub id: i16,
    pub footer_text: String,
    pub theme_color: String,
}

impl From<SiteSettingsRow> for SiteSettings {
    fn from(row: SiteSettingsRow) -> Self {
        Self {
            footer_text: row.footer_text,
            theme_color: row.theme_color,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = site_settings)]
pub(crate) struct SiteSettingsValues<'a> {
    pub id: i16,
    pub footer_text: &'a str,
    pub theme_color: &'a str,
}
