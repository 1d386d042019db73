//! Family routes
//!
//! Maintain a user's list of linked contact ids. The relation is directional
//! and unmoderated: adding someone does not notify them or require consent.
//!
//! The add/remove handlers are read-modify-write against the user document
//! and are not transactional: two concurrent mutations of the same user can
//! both read the same list, and the last write wins.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use sangam_store::UserProfile;

use crate::error::{ApiError, Result};
use crate::routes::user_id_from_handle;
use crate::state::AppState;

/// Add/remove request
#[derive(Debug, Deserialize)]
pub struct FamilyMemberRequest {
    pub family_member_id: Option<String>,
}

/// Add-family response
#[derive(Debug, Serialize)]
pub struct AddFamilyResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: String,
    pub family_member: UserProfile,
    pub total_family_members: usize,
}

/// Link a contact to the user's family list
///
/// POST /@{user_id}/add_family
pub async fn add_family_member(
    State(state): State<AppState>,
    Path(user_handle): Path<String>,
    Json(req): Json<FamilyMemberRequest>,
) -> Result<Json<AddFamilyResponse>> {
    let user_id = user_id_from_handle(&user_handle)?;
    let member_id = required_member_id(&req)?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let member = state
        .store
        .get_user(member_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Family member not found"))?;

    if user.family_members.iter().any(|m| m == member_id) {
        return Err(ApiError::conflict("Family member already added"));
    }

    let mut family_members = user.family_members;
    family_members.push(member_id.to_string());
    state
        .store
        .put_family_members(user_id, &family_members)
        .await?;

    Ok(Json(AddFamilyResponse {
        success: true,
        message: "Family member added successfully",
        user_id: user_id.to_string(),
        family_member: member.profile(),
        total_family_members: family_members.len(),
    }))
}

/// A resolved family member in a listing
#[derive(Debug, Serialize)]
pub struct FamilyMemberEntry {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub is_active: bool,
}

/// Family listing response
#[derive(Debug, Serialize)]
pub struct FamilyListResponse {
    pub success: bool,
    pub user_id: String,
    pub family_members: Vec<FamilyMemberEntry>,
    pub total_count: usize,
}

/// List the user's linked contacts, resolved to their current identities
///
/// GET /@{user_id}/family
///
/// Ids whose target record no longer exists are silently skipped.
pub async fn list_family_members(
    State(state): State<AppState>,
    Path(user_handle): Path<String>,
) -> Result<Json<FamilyListResponse>> {
    let user_id = user_id_from_handle(&user_handle)?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let mut family_members = Vec::with_capacity(user.family_members.len());
    for member_id in &user.family_members {
        if let Some(member) = state.store.get_user(member_id).await? {
            family_members.push(FamilyMemberEntry {
                user_id: member.user_id,
                username: member.username,
                email: member.email,
                mobile_number: member.mobile_number,
                is_active: member.is_active,
            });
        }
    }

    let total_count = family_members.len();
    Ok(Json(FamilyListResponse {
        success: true,
        user_id: user_id.to_string(),
        family_members,
        total_count,
    }))
}

/// Remove-family response
#[derive(Debug, Serialize)]
pub struct RemoveFamilyResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: String,
    pub removed_member_id: String,
    pub total_family_members: usize,
}

/// Unlink a contact from the user's family list
///
/// POST /@{user_id}/remove_family
pub async fn remove_family_member(
    State(state): State<AppState>,
    Path(user_handle): Path<String>,
    Json(req): Json<FamilyMemberRequest>,
) -> Result<Json<RemoveFamilyResponse>> {
    let user_id = user_id_from_handle(&user_handle)?;
    let member_id = required_member_id(&req)?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let mut family_members = user.family_members;
    let position = family_members
        .iter()
        .position(|m| m == member_id)
        .ok_or_else(|| ApiError::not_found("Family member not found in your family list"))?;
    family_members.remove(position);

    state
        .store
        .put_family_members(user_id, &family_members)
        .await?;

    Ok(Json(RemoveFamilyResponse {
        success: true,
        message: "Family member removed successfully",
        user_id: user_id.to_string(),
        removed_member_id: member_id.to_string(),
        total_family_members: family_members.len(),
    }))
}

fn required_member_id(req: &FamilyMemberRequest) -> Result<&str> {
    match req.family_member_id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(ApiError::validation("Family member ID is required")),
    }
}
