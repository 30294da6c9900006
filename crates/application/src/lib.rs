//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：在线状态投影、消息时间线投影、
//! 乐观发送管线、管理员审核操作、公告板用例和会话生命周期，
//! 以及对托管后端适配器（存储、认证、本地缓存）的抽象。

pub mod clock;
pub mod dto;
pub mod error;
pub mod repository;
pub mod services;
pub mod session;
pub mod subscription;

pub use clock::{Clock, SystemClock};
pub use dto::{time_label, MessageView, Roster, UserEntry};
pub use error::{ApplicationError, ApplicationResult};
pub use repository::{
    AuthAccount, AuthError, AuthGateway, FederatedProvider, MessageStore, NoticeStore,
    PresenceStore, ProfileCache, StoreError,
};
pub use services::{
    filter_notices, project_roster, project_timeline, ChatService, ChatServiceDependencies,
    Confirmation, ModerationService, NoticeQuery, NoticeService, RosterService, SessionService,
    SessionServiceDependencies,
};
pub use session::SessionContext;
pub use subscription::SnapshotStream;
