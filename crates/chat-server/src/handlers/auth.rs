//! Authentication handlers
//!
//! Signup and login set the `jwt` session cookie; logout clears it.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chat_core::{LoginRequest, SignupRequest, UpdateProfileRequest, User};
use serde::Serialize;

use crate::extractors::{AuthUser, JsonBody, ValidatedJson, SESSION_COOKIE};
use crate::response::{ApiResult, Created};
use crate::services::{AuthService, AuthSession};
use crate::state::AppState;

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config().app.env.is_production())
        .max_age(time::Duration::seconds(state.jwt_service().expiry_secs()))
        .build()
}

fn expired_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

fn with_session(state: &AppState, jar: CookieJar, session: AuthSession) -> (CookieJar, Json<User>) {
    let jar = jar.add(session_cookie(state, session.token));
    (jar, Json(session.user))
}

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<(CookieJar, Json<User>)>> {
    let session = AuthService::new(state.service_context()).signup(request).await?;
    Ok(Created(with_session(&state, jar, session)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<(CookieJar, Json<User>)> {
    let session = AuthService::new(state.service_context()).login(request).await?;
    Ok(with_session(&state, jar, session))
}

/// POST /auth/logout
///
/// Succeeds with or without a session.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageBody>) {
    (
        jar.add(expired_cookie()),
        Json(MessageBody {
            message: "Logged out successfully",
        }),
    )
}

/// GET /auth/check
pub async fn check(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    let user = AuthService::new(state.service_context())
        .current_user(auth.user_id)
        .await?;
    Ok(Json(user))
}

/// PUT /auth/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = AuthService::new(state.service_context())
        .update_profile(auth.user_id, request)
        .await?;
    Ok(Json(user))
}
