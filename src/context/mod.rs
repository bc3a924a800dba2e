//! Collaborators consulted by the matchers
//!
//! The evaluator only sees these traits. Request parsing, user storage and
//! HTTP responses belong to the integrating application; the types in the
//! submodules are small in-memory implementations for tests, the CLI and
//! simple embeddings.

mod origin;
mod principal;
mod responder;

pub use origin::RemoteAddr;
pub use principal::StaticPrincipal;
pub use responder::{StatusRecorder, STATUS_FORBIDDEN};

/// Identity key the users matcher asks the principal for
pub const USERNAME_KEY: &str = "username";

/// The authenticated (or guest) caller
pub trait Principal: Send + Sync {
    fn is_guest(&self) -> bool;

    /// Identity attribute, e.g. [`USERNAME_KEY`]
    fn get(&self, key: &str) -> Option<String>;

    /// Role or permission check
    fn check(&self, role: &str) -> bool;
}

/// Network origin of the current request
pub trait Origin: Send + Sync {
    /// True if the request address matches any entry (exact or CIDR)
    fn is_ips(&self, ips: &[String]) -> bool;
}

/// Outgoing response
pub trait Responder: Send + Sync {
    /// Mark the response as 403 Forbidden
    fn send_forbidden(&self);
}
