/// User API routes
use crate::{
    error::{Result, ServerError},
    services::ProfileUpdate,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use qresume_core::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignOnRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignOnResponse {
    pub message: &'static str,
    /// `registered` or `logged_in`
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct UserDetailsRequest {
    /// Must match the path email when present
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub leetcode: String,
    #[serde(default, rename = "geeksforgeeks")]
    pub geeks_for_geeks: String,
    #[serde(default)]
    pub scaler: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateDetailsResponse {
    pub message: &'static str,
    pub user: User,
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

/// POST /api/sign-on
/// Register, or log in when the email is already registered
pub async fn sign_on(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<SignOnRequest>, JsonRejection>,
) -> Result<Json<SignOnResponse>> {
    let Json(req) = payload?;

    let outcome = app_state
        .user_service
        .sign_on(&req.email, &req.password)
        .await?;

    Ok(Json(SignOnResponse {
        message: "User signed on successfully",
        status: outcome.status(),
    }))
}

/// PATCH /api/users/details/:email
/// Replace profile details and regenerate QR codes
pub async fn update_details(
    Path(email): Path<String>,
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<UserDetailsRequest>, JsonRejection>,
) -> Result<Json<UpdateDetailsResponse>> {
    let Json(req) = payload?;

    if let Some(body_email) = req.email.as_deref() {
        if body_email != email {
            return Err(ServerError::BadRequest(
                "email in body does not match email in path".to_string(),
            ));
        }
    }

    let profile = ProfileUpdate {
        name: req.name,
        phone: req.phone,
        linkedin: req.linkedin,
        github: req.github,
        leetcode: req.leetcode,
        geeks_for_geeks: req.geeks_for_geeks,
        scaler: req.scaler,
    };

    let user = app_state
        .user_service
        .update_details(&email, &req.password, profile)
        .await?;

    Ok(Json(UpdateDetailsResponse {
        message: "User details updated successfully",
        user,
    }))
}

/// GET /api/users/details/:email
pub async fn get_details(
    Path(email): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<User>> {
    let user = app_state.user_service.get_details(&email).await?;
    Ok(Json(user))
}

/// GET /api/users/my-qr/:email
/// Respond with the user's combined QR code PNG
pub async fn get_qr_code(
    Path(email): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Response> {
    let path = app_state.user_service.qr_code_path(&email).await?;
    let bytes = tokio::fs::read(&path).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}
