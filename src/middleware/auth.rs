use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::auth::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller injected into request extensions by the gate
#[derive(Clone, Debug)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Gate for everything under /cashcards: parse HTTP Basic credentials, check
/// them against the user directory, and require the CARD-OWNER role. The
/// request continues with a Principal in its extensions. Credentials are
/// re-checked on every request; there is no session state.
pub async fn require_card_owner(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) = extract_basic_credentials(&headers).map_err(|msg| {
        tracing::warn!("Rejected request: {}", msg);
        ApiError::unauthorized("Authentication required")
    })?;

    // Unknown user and wrong password share this same rejection
    let account = state
        .users
        .authenticate(&username, &password)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let principal = Principal {
        username: account.username.clone(),
        roles: account.roles.clone(),
    };

    if !principal.has_role(Role::CardOwner) {
        tracing::warn!(
            "User '{}' lacks the {} role",
            principal.username,
            Role::CardOwner.as_str()
        );
        return Err(ApiError::forbidden("Access denied"));
    }

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Pull username and password out of an `Authorization: Basic ...` header
fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let encoded = auth_str
        .strip_prefix("Basic ")
        .ok_or_else(|| "Authorization header must use Basic scheme".to_string())?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| "Invalid base64 in Authorization header".to_string())?;

    let decoded =
        String::from_utf8(decoded).map_err(|_| "Credentials are not valid UTF-8".to_string())?;

    // Only the first colon separates username from password
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "Credentials must be username:password".to_string())?;

    Ok((username.to_string(), password.to_string()))
}
