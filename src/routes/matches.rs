use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use validator::Validate;

use super::{
    bad_request, backend_failure, check_user_id, invalidate_decks, load_profile, validation_failed,
    AppState,
};
use crate::core::{generate_avatar, generate_summary, DeckResult};
use crate::models::{
    CompatibilityRequest, DeckCard, DeckRequest, DeckResponse, HealthResponse, MatchedProfile,
    MatchesResponse, SwipeAction, SwipeRecord, SwipeRequest, SwipeResponse,
};
use crate::services::CacheKey;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/deck", web::post().to(get_deck))
        .route("/compatibility", web::post().to(compatibility))
        .route("/swipes", web::post().to(record_swipe))
        .route("/matches/{user_id}", web::get().to(list_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let backend_healthy = state.backend.health_check().await.unwrap_or(false);

    let status = if backend_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build the swipe deck for a user
///
/// POST /api/v1/deck
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "minScore": 50,
///   "limit": 20
/// }
/// ```
async fn get_deck(state: web::Data<AppState>, req: web::Json<DeckRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for deck request: {:?}", errors);
        return validation_failed(&errors);
    }

    let user_id = &req.user_id;
    let min_score = req.min_score.unwrap_or(state.deck.min_score);
    let limit = req
        .limit
        .map(usize::from)
        .unwrap_or(state.deck.default_limit);

    tracing::info!("Building deck for user: {}, min score: {}, limit: {}", user_id, min_score, limit);

    let cache_key = CacheKey::deck(user_id, min_score);
    let deck = match state.cache.get::<DeckResult>(&cache_key).await {
        Ok(deck) => deck,
        Err(_) => match rank_deck(&state, user_id, min_score).await {
            Ok(deck) => {
                if let Err(e) = state.cache.set(&cache_key, &deck).await {
                    tracing::warn!("Failed to cache deck for {}: {}", user_id, e);
                }
                deck
            }
            Err(response) => return response,
        },
    };

    let mut rng = rand::thread_rng();
    let cards: Vec<DeckCard> = deck
        .matches
        .into_iter()
        .take(limit)
        .map(|m| DeckCard {
            avatar: generate_avatar(&m.profile.id).to_string(),
            summary: generate_summary(&m.profile, &mut rng),
            profile: m.profile,
            score: m.score,
            reasons: m.reasons,
        })
        .collect();

    tracing::info!(
        "Returning {} cards for user {} (from {} candidates)",
        cards.len(),
        user_id,
        deck.total_candidates
    );

    HttpResponse::Ok().json(DeckResponse {
        cards,
        min_score,
        total_candidates: deck.total_candidates,
    })
}

/// Fetch the viewer, exclusions and candidate pool, then rank
async fn rank_deck(
    state: &AppState,
    user_id: &str,
    min_score: u8,
) -> Result<DeckResult, HttpResponse> {
    let viewer = load_profile(state, user_id).await?;

    // A missing swipe history only means repeats; proceed without it
    let swiped = match state.backend.get_swiped_ids(user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Failed to fetch swipes for {}, proceeding without filtering: {}", user_id, e);
            vec![]
        }
    };

    // Blocks are never skipped
    let blocked = state.backend.get_blocked_ids(user_id).await.map_err(|e| {
        tracing::error!("Failed to fetch blocks for {}: {}", user_id, e);
        backend_failure("Failed to fetch blocks", &e)
    })?;

    let exclude: HashSet<String> = swiped.into_iter().chain(blocked).collect();
    let exclude_ids: Vec<String> = exclude.iter().cloned().collect();

    tracing::debug!("Excluding {} profiles for user {}", exclude.len(), user_id);

    let candidates = state
        .backend
        .query_candidates(user_id, &exclude_ids, state.deck.pool_limit)
        .await
        .map_err(|e| {
            tracing::error!("Failed to query candidates for {}: {}", user_id, e);
            backend_failure("Failed to query candidates", &e)
        })?;

    Ok(state.matcher.build_deck(&viewer, candidates, &exclude, min_score))
}

/// Score one candidate for a viewer
///
/// POST /api/v1/compatibility
async fn compatibility(
    state: web::Data<AppState>,
    req: web::Json<CompatibilityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let viewer = match load_profile(&state, &req.viewer_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    let candidate = match load_profile(&state, &req.candidate_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(state.matcher.score(&viewer, &candidate))
}

/// Record a swipe and report whether it completed a mutual match
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string",
///   "action": "like|pass"
/// }
/// ```
async fn record_swipe(state: web::Data<AppState>, req: web::Json<SwipeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let action: SwipeAction = match req.action.parse() {
        Ok(action) => action,
        Err(_) => {
            return bad_request("Invalid action", "Action must be one of: like, pass");
        }
    };

    if req.user_id == req.target_user_id {
        return bad_request("Invalid target", "Users cannot swipe on themselves");
    }

    let swipe = SwipeRecord {
        user_id: req.user_id.clone(),
        target_user_id: req.target_user_id.clone(),
        action,
        created_at: None,
    };

    if let Err(e) = state.backend.record_swipe(&swipe).await {
        tracing::error!("Failed to record swipe: {}", e);
        return backend_failure("Failed to record swipe", &e);
    }

    // Read after insert: two simultaneous likes can both miss each other
    let mutual_match = match action {
        SwipeAction::Like => state
            .backend
            .has_liked(&req.target_user_id, &req.user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to check mutual like: {}", e);
                false
            }),
        SwipeAction::Pass => false,
    };

    if mutual_match {
        tracing::info!("Mutual match: {} <-> {}", req.user_id, req.target_user_id);
    }

    invalidate_decks(&state, &req.user_id).await;

    HttpResponse::Ok().json(SwipeResponse {
        success: true,
        mutual_match,
    })
}

/// Mutual matches of a user, most recent first
///
/// GET /api/v1/matches/{userId}
async fn list_matches(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    if let Err(response) = check_user_id(&user_id) {
        return response;
    }

    let ids = match state.backend.get_mutual_match_ids(&user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to fetch matches for {}: {}", user_id, e);
            return backend_failure("Failed to fetch matches", &e);
        }
    };

    let profiles = match state.backend.get_profiles(&ids).await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Failed to fetch matched profiles for {}: {}", user_id, e);
            return backend_failure("Failed to fetch matches", &e);
        }
    };

    let matches = profiles
        .into_iter()
        .map(|profile| MatchedProfile {
            avatar: generate_avatar(&profile.id).to_string(),
            profile,
        })
        .collect();

    HttpResponse::Ok().json(MatchesResponse { user_id, matches })
}
