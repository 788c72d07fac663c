//! JWT claim structures for CatalogFlow credentials.
//!
//! Both credential kinds share one claim set: `{sub, type, exp}`. The `type`
//! claim is what keeps a renewal token from being accepted where an access
//! token is required, and vice versa.

use serde::{Deserialize, Serialize};

/// Which kind of credential a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential authorizing resource access.
    Access,
    /// Longer-lived credential usable only to obtain a new access token.
    /// Tokens tagged `"refresh"` are read as renewal tokens.
    #[serde(rename = "renewal", alias = "refresh")]
    Renewal,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Renewal => "renewal",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw claim set as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Expiration (Unix timestamp, seconds)
    pub exp: i64,
}
