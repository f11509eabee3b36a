//! 聚合引擎
//!
//! 纯函数：输入是解析后的活动记录，输出是报表片段。不接触浏览器。

pub mod checklist;
pub mod classify;
pub mod events;
pub mod members;
pub mod names;
pub mod numbers;
pub mod sessions;
pub mod visitors;

pub use checklist::aggregate_checklist;
pub use classify::{EventType, SessionType};
pub use events::aggregate_events;
pub use members::{aggregate_members, MemberAggregate};
pub use sessions::aggregate_sessions;
pub use visitors::aggregate_visitors;
