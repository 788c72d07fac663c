//! # CatalogFlow Auth
//!
//! Stateless credential handling for the CatalogFlow API.
//!
//! - [`claims`]: The `{sub, type, exp}` claim set and [`TokenKind`]
//! - [`jwt`]: Credential codec (sign, decode, expiry)
//! - [`issuer`]: Access + renewal token pairs
//! - [`verifier`]: Signature, expiry and kind checks in front of protected
//!   resources
//!
//! Nothing here touches the store; callers resolve the returned user id.
//!
//! # Example
//!
//! ```ignore
//! use catalogflow_auth::{TokenKind, issue_token_pair, verify_token};
//!
//! let pair = issue_token_pair(user_id, &jwt_config)?;
//! let subject = verify_token(&pair.access_token, TokenKind::Access, &jwt_config)?;
//! assert_eq!(subject, user_id);
//! ```

pub mod claims;
pub mod issuer;
pub mod jwt;
pub mod verifier;

// Re-export commonly used types at crate root
pub use claims::{Claims, TokenKind};
pub use issuer::{
    TokenPair, issue_access_token, issue_access_token_at, issue_token_pair, issue_token_pair_at,
};
pub use jwt::{CodecError, DecodedToken, decode_token, decode_token_at, encode_token};
pub use verifier::{verify_token, verify_token_at};
