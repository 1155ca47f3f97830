//! Web edge: the gated page routes and the auth action endpoints

pub mod routes;
pub mod server;

pub use server::*;
