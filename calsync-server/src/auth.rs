//! Bearer-token authentication for the API.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use calsync_core::{CalSyncError, PermissionGate, PermissionSet};

use crate::routes::ApiError;
use crate::state::AppState;

/// Extractor that resolves the `Authorization: Bearer <token>` header to
/// the token's permission set. Rejects with 401 when the header is missing
/// or the token is unknown.
///
/// Handlers then gate themselves with [`Authenticated::require`]:
///
/// ```ignore
/// async fn handler(auth: Authenticated) -> Result<..., ApiError> {
///     auth.require(&["read"])?;
///     // ...
/// }
/// ```
pub struct Authenticated {
    gate: Arc<PermissionGate>,
    permissions: PermissionSet,
}

impl Authenticated {
    /// Authorize against the operation's required permissions. One match
    /// (or the wildcard) is enough.
    pub fn require(&self, required: &[&str]) -> Result<(), ApiError> {
        self.gate
            .authorize(&self.permissions, required)
            .map_err(ApiError::from)
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::from(CalSyncError::MissingToken))?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header);
        let permissions = state.gate.authenticate(token).map_err(ApiError::from)?;

        Ok(Authenticated {
            gate: state.gate.clone(),
            permissions: permissions.clone(),
        })
    }
}

/// Render a token safe for logs and listings: first four and last four
/// characters with the middle elided. Short tokens are fully hidden since
/// `first4...last4` would echo most of them back.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len() - 4..].iter().collect();
    format!("{first}...{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_elides_the_middle() {
        assert_eq!(mask_token("demo-token-12345"), "demo...2345");
    }

    #[test]
    fn mask_hides_short_tokens_entirely() {
        assert_eq!(mask_token("abc"), "****");
        assert_eq!(mask_token("12345678"), "****");
    }
}
