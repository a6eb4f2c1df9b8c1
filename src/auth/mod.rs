pub mod claims;
pub mod guard;
pub mod session;
pub mod token;

pub use claims::TokenClaims;
pub use guard::{Access, RoleRequirement, RouteGuard};
pub use session::{Session, SessionStore};
