//! Authentication service
//!
//! Account creation, login, session lookup, and profile image updates.

use chat_common::{AppError, AppResult};
use chat_core::{LoginRequest, SignupRequest, Snowflake, UpdateProfileRequest, User};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

/// A user together with a freshly issued session token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and start a session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthSession> {
        let email = request.email.trim().to_string();

        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(AppError::AlreadyExists("Email already exists".to_string()));
        }

        let password_hash = self.ctx.passwords().hash(&request.password)?;

        let user = User::new(
            self.ctx.generate_id(),
            request.full_name.trim().to_string(),
            email,
        );

        // A concurrent signup can still win the race; the repository reports it
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User signed up");

        self.start_session(user)
    }

    /// Verify credentials and start a session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthSession> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                AppError::InvalidCredentials
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        self.ctx
            .passwords()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: wrong password"))?;

        info!(user_id = %user.id, "User logged in");

        self.start_session(user)
    }

    /// Resolve the user behind a session
    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: Snowflake) -> AppResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Replace the profile image
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> AppResult<User> {
        let mut user = self.current_user(user_id).await?;
        user.set_profile_pic(request.profile_pic);

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(user)
    }

    fn start_session(&self, user: User) -> AppResult<AuthSession> {
        let token = self.ctx.jwt_service().issue(user.id)?;
        Ok(AuthSession { user, token })
    }
}
