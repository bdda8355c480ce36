// Route exports
pub mod matches;
pub mod messages;
pub mod moderation;
pub mod profiles;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::config::DeckSettings;
use crate::core::Matcher;
use crate::models::{is_valid_user_id, ErrorResponse, Profile};
use crate::services::{BackendClient, BackendError, CacheKey, CacheManager};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub deck: DeckSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure)
            .configure(moderation::configure)
            .configure(messages::configure),
    );
}

fn validation_failed(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "Validation failed",
        errors.to_string(),
        400,
    ))
}

fn bad_request(error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(error, message, 400))
}

/// Reject path ids that are not plain user ids
fn check_user_id(user_id: &str) -> Result<(), HttpResponse> {
    if is_valid_user_id(user_id) {
        Ok(())
    } else {
        Err(bad_request(
            "Invalid user id",
            "User ids may only contain letters, digits, '-' and '_'",
        ))
    }
}

/// Map a backend failure to a JSON error response
fn backend_failure(error: &str, e: &BackendError) -> HttpResponse {
    match e {
        BackendError::NotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::new(error, e.to_string(), 404))
        }
        _ => HttpResponse::InternalServerError().json(ErrorResponse::new(error, e.to_string(), 500)),
    }
}

/// Fetch a profile, going through the profile cache
async fn load_profile(state: &AppState, user_id: &str) -> Result<Profile, HttpResponse> {
    let key = CacheKey::profile(user_id);
    if let Ok(profile) = state.cache.get::<Profile>(&key).await {
        return Ok(profile);
    }

    let profile = state.backend.get_profile(user_id).await.map_err(|e| {
        tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
        backend_failure("Failed to fetch profile", &e)
    })?;

    if let Err(e) = state.cache.set(&key, &profile).await {
        tracing::warn!("Failed to cache profile {}: {}", user_id, e);
    }

    Ok(profile)
}

/// Drop every cached deck of `user_id`
async fn invalidate_decks(state: &AppState, user_id: &str) {
    if let Err(e) = state.cache.invalidate_prefix(&CacheKey::deck_prefix(user_id)).await {
        tracing::warn!("Failed to invalidate decks for {}: {}", user_id, e);
    }
}
