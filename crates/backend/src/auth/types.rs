//! Auth-related types.

use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// The identity fields come verbatim from the RétroBus identity API at login
/// and are never modified afterwards; verification trusts the signature, not
/// live provider state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Member identifier assigned by the identity API
    pub id: String,
    pub email: String,
    pub name: String,
    /// Membership category, opaque to this service
    pub role: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}
