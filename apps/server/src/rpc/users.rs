//! User procedures: account creation, login, administration.

use crate::error::ApiError;
use crate::AppState;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use till_core::{validation, Role, User};
use till_db::password;
use tracing::{info, warn};
use uuid::Uuid;

/// `createUser` input
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// `loginUser` input
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// The user projection returned on login
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub role: Role,
}

/// `loginUser` response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// `setUserActive` input
#[derive(Debug, Deserialize)]
pub struct SetUserActiveInput {
    pub user_id: String,
    pub is_active: bool,
}

/// Create a staff account. New accounts are always active.
pub async fn create_user(state: &AppState, input: CreateUserInput) -> Result<User, ApiError> {
    validation::validate_username(&input.username)?;
    validation::validate_email(&input.email)?;
    validation::validate_password(&input.password)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash: password::hash_password(&input.password)?,
        role: input.role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    state.db.users().insert(&user).await?;

    info!(username = %user.username, role = ?user.role, "user created");
    Ok(user)
}

/// Authenticate a user and issue a session token.
///
/// Unknown username, inactive account, and wrong password all produce
/// the same rejection, so the response never confirms whether an
/// account exists.
pub async fn login_user(state: &AppState, input: LoginInput) -> Result<LoginResponse, ApiError> {
    let denied = || ApiError::unauthorized("invalid username or password");

    let user = state
        .db
        .users()
        .get_by_username(input.username.trim())
        .await?
        .ok_or_else(denied)?;

    if !user.is_active {
        warn!(username = %user.username, "login attempt on inactive account");
        return Err(denied());
    }

    if !password::verify_password(&input.password, &user.password_hash) {
        return Err(denied());
    }

    let token = state.jwt.generate_token(&user)?;
    info!(username = %user.username, "user logged in");

    Ok(LoginResponse {
        token,
        user: UserSummary {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    })
}

/// All users, username order
pub async fn get_users(state: &AppState) -> Result<Vec<User>, ApiError> {
    Ok(state.db.users().list().await?)
}

/// Enable or disable an account
pub async fn set_user_active(
    state: &AppState,
    input: SetUserActiveInput,
) -> Result<User, ApiError> {
    validation::validate_id("user_id", &input.user_id)?;

    let user = state
        .db
        .users()
        .set_active(&input.user_id, input.is_active)
        .await?;

    info!(username = %user.username, is_active = user.is_active, "user active flag changed");
    Ok(user)
}
