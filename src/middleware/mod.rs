pub mod auth;

pub use auth::{AdminUser, CurrentIdentity, SessionGate};
