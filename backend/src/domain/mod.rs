//! Domain primitives, forms, ports and use-case services.
//!
//! Purpose: define the eco-actions entities and the rules applied to user
//! input, independent of HTTP and storage. Adapters live in `inbound` and
//! `outbound` and talk to the domain only through [`ports`] and the
//! services re-exported here.

pub mod account_service;
pub mod action_service;
pub mod actions;
pub mod activity;
pub mod activity_service;
pub mod auth;
pub mod engagement;
pub mod engagement_service;
pub mod error;
pub mod event_service;
pub mod events;
pub mod forms;
mod ids;
pub mod ports;
pub mod team;
pub mod team_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::action_service::{ActionService, SearchOutcome};
pub use self::actions::{Category, EcoAction, SearchResults, Upload};
pub use self::activity::{SearchLog, Visit, VisitDetails};
pub use self::activity_service::{ActivityService, HistorySummary};
pub use self::engagement::{ContactMessage, Feedback};
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode};
pub use self::event_service::EventService;
pub use self::events::Event;
pub use self::forms::{FieldErrors, FileUpload, FormError};
pub use self::ids::{
    CategoryId, ContactMessageId, EcoActionId, EventId, FeedbackId, InvalidId, LoginActivityId,
    SearchLogId, TeamMemberId, UploadId, UserHistoryId, UserId, UserProfileId, VisitId,
};
pub use self::team::{SiteSettings, TeamMember};
pub use self::team_service::TeamService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{CurrentUser, LoginActivity, User, UserHistory, UserProfile};
