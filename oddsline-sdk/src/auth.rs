//! Authentication headers used by the Oddsline APIs.
//!
//! Account routes take a pre-provisioned bearer token in the standard
//! `Authorization` header. Admin routes carry the plaintext admin secret
//! in [`ADMIN_AUTH_HEADER`]; the server verifies it against an argon2 hash.

/// Header name for admin API authentication (plaintext secret).
pub const ADMIN_AUTH_HEADER: &str = "Oddsline-Admin-Authorization";

/// Scheme prefix of the account `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Format an `Authorization` header value for an account token.
pub fn bearer(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

/// Extract the token from an `Authorization` header value.
///
/// Returns `None` when the scheme is not `Bearer` or the token is empty.
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_roundtrip() {
        let header = bearer("tok-123");
        assert_eq!(header, "Bearer tok-123");
        assert_eq!(parse_bearer(&header), Some("tok-123"));
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes() {
        assert_eq!(parse_bearer("Basic abc"), None);
        assert_eq!(parse_bearer("Bearer    "), None);
        assert_eq!(parse_bearer("tok-123"), None);
    }
}
