pub mod lenient;
pub mod permission;
pub mod user;
