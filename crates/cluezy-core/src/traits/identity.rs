//! Requesting-user resolution

/// User id used when a request carries no identity
pub const ANONYMOUS_USER: &str = "anonymous";

/// Identity material extracted from a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// `x-user-id` header
    pub user_id: Option<String>,
}

/// Resolves the current user
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self, credentials: &Credentials) -> String;
}

/// Trusts the `x-user-id` header, falling back to [`ANONYMOUS_USER`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderIdentity;

impl IdentityProvider for HeaderIdentity {
    fn current_user(&self, credentials: &Credentials) -> String {
        credentials
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(ANONYMOUS_USER)
            .to_string()
    }
}
