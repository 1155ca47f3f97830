//! Salonpanel - session handling and role-based routing for the salon admin panel
//!
//! This is the library interface for Salonpanel: the cookie-backed session
//! store, the token-refreshing backend client and the route authorization
//! gate, plus the web edge that ties them together.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod web;

pub use auth::{GateDecision, SessionStore};
pub use backend::BackendClient;
pub use config::Config;
pub use error::Error;
