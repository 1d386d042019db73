//! Identity routes
//!
//! Registration and lookup-by-id login. There are no credentials: logging in
//! is presenting a known user id, which stamps last-login and returns the
//! stored identity fields.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use sangam_store::{UserRecord, generate_user_id};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}

/// Identity fields echoed back on registration
#[derive(Debug, Serialize)]
pub struct IdentityData {
    pub username: String,
    pub email: String,
    pub mobile_number: String,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: String,
    pub data: IdentityData,
}

/// Register a new user
///
/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let username = required_field("username", req.username.as_deref())?;
    let email = required_field("email", req.email.as_deref())?;
    let mobile_number = required_field("mobile_number", req.mobile_number.as_deref())?;

    // Best-effort duplicate check; concurrent registrations can still both
    // pass it, since email is not unique at the storage level.
    if state.store.find_user_by_email(email).await?.is_some() {
        return Err(ApiError::conflict("User with this email already exists"));
    }

    // Generate until the id is unused. Collisions in the 36^8 space are
    // vanishingly rare, so this loop almost always runs once.
    let user_id = loop {
        let candidate = generate_user_id();
        if state.store.get_user(&candidate).await?.is_none() {
            break candidate;
        }
    };

    let user = UserRecord::new(&user_id, username, email, mobile_number);
    state.store.insert_user(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully",
            user_id: user.user_id,
            data: IdentityData {
                username: user.username,
                email: user.email,
                mobile_number: user.mobile_number,
            },
        }),
    ))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: Option<String>,
}

/// Identity fields plus the current contact-id list
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub family_members: Vec<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: String,
    pub data: LoginData,
}

/// Log a user in by id, stamping last-login
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user_id = match req.user_id.as_deref() {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(ApiError::validation("User ID is required")),
    };

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    state.store.update_last_login(&user.user_id).await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
        user_id: user.user_id,
        data: LoginData {
            username: user.username,
            email: user.email,
            mobile_number: user.mobile_number,
            family_members: user.family_members,
        },
    }))
}

/// Reject a missing or empty required field
fn required_field<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!(
            "Missing required field: {name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        assert_eq!(required_field("username", Some("asha")).unwrap(), "asha");
        assert!(required_field("username", Some("")).is_err());
        assert!(required_field("username", Some("   ")).is_err());
        assert!(required_field("username", None).is_err());
    }
}
