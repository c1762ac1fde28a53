use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{NewUser, User};
use crate::users::dto::{LoginRequest, RegisterRequest, UpdateUserRequest};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Ids arrive as path text. One this layer cannot parse is treated like any
/// other backend fault, not as a distinct client error.
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::Internal(e.into()))
}

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<User, ApiError> {
    let name = match req.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ApiError::Validation("nome is required".to_string())),
    };
    let email = match req.email {
        Some(email) => normalize_email(&email),
        None => return Err(ApiError::Validation("email is required".to_string())),
    };
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("email is invalid".to_string()));
    }
    let password = match req.password {
        Some(password) if !password.is_empty() => password,
        _ => return Err(ApiError::Validation("senha is required".to_string())),
    };

    let password_hash = state.hasher.hash(&password)?;
    let user = state
        .store
        .insert(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

pub async fn list_users(state: &AppState) -> Result<Vec<User>, ApiError> {
    Ok(state.store.list().await?)
}

pub async fn get_user(state: &AppState, id: &str) -> Result<User, ApiError> {
    let id = parse_id(id)?;
    state.store.find_by_id(id).await?.ok_or(ApiError::NotFound)
}

/// Applies the provided fields to an existing record. Only a senha change
/// touches the stored hash.
pub async fn update_user(
    state: &AppState,
    id: &str,
    changes: UpdateUserRequest,
) -> Result<User, ApiError> {
    let id = parse_id(id)?;
    let mut user = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(name) = changes.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("nome must not be empty".to_string()));
        }
        user.name = name;
    }
    if let Some(email) = changes.email {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(ApiError::Validation("email is invalid".to_string()));
        }
        user.email = email;
    }
    if let Some(password) = changes.password {
        if password.is_empty() {
            return Err(ApiError::Validation("senha must not be empty".to_string()));
        }
        user.password_hash = state.hasher.hash(&password)?;
    }

    let updated = state
        .store
        .update(&user)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = %updated.id, "user updated");
    Ok(updated)
}

pub async fn delete_user(state: &AppState, id: &str) -> Result<(), ApiError> {
    let id = parse_id(id)?;
    if state.store.delete(id).await? {
        info!(user_id = %id, "user deleted");
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}

/// Checks credentials and signs a session token. Unknown email and wrong
/// password take the same rejection path.
pub async fn authenticate(state: &AppState, req: LoginRequest) -> Result<(String, Uuid), ApiError> {
    let (email, password) = match (req.email, req.password) {
        (Some(email), Some(password)) => (normalize_email(&email), password),
        _ => return Err(ApiError::InvalidCredentials),
    };

    let user = state
        .store
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !state.hasher.verify(&password, &user.password_hash) {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((token, user.id))
}
