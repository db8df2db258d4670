pub mod api;
pub mod authz;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod navigation;
pub mod session;
pub mod utils;

// Re-export commonly used items for tests
pub use authz::{PermissionEvaluator, PermissionHook};
pub use navigation::{RouterState, SessionRouter};
pub use session::{MemorySessionStore, SessionRepository, SessionStore, SqliteSessionStore};
