pub mod auth;
pub mod coordinator;
pub mod handle;

pub use auth::{Authenticator, DashboardLogin};
pub use coordinator::{SessionCoordinator, SessionPhase};
pub use handle::SessionHandle;
