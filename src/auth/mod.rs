//! Authentication, session and route authorization

pub mod actions;
pub mod claims;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod session;

pub use actions::AuthClient;
pub use claims::{decode_claims, default_role_path, Claims, DecodeError};
pub use gate::{evaluate, GateDecision, RouteClass};
pub use middleware::{route_gate, RequestCookies};
pub use models::{Role, RoleSet, TokenPair};
pub use session::{CookieOptions, CookieStore, MemoryCookieStore, SessionStore};
