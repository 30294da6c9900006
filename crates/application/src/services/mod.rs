//! 应用层用例服务

mod chat_service;
mod moderation_service;
mod notice_service;
mod roster_service;
mod session_service;

pub use chat_service::{project_timeline, ChatService, ChatServiceDependencies};
pub use moderation_service::{Confirmation, ModerationService};
pub use notice_service::{filter_notices, NoticeQuery, NoticeService};
pub use roster_service::{project_roster, RosterService};
pub use session_service::{SessionService, SessionServiceDependencies};

mod moderation_service_tests;
mod notice_service_tests;
