use actix_web::{web, HttpResponse, Responder};

use super::{check_user_id, load_profile, AppState};
use crate::core::{extract_traits, generate_avatar, generate_summary};
use crate::models::{AvatarResponse, SummaryResponse};

/// Configure profile presentation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles/{id}/summary", web::get().to(get_summary))
        .route("/profiles/{id}/avatar", web::get().to(get_avatar));
}

/// Personality summary for a profile
///
/// GET /api/v1/profiles/{id}/summary
///
/// The sentence template varies between calls; the traits do not.
async fn get_summary(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    if let Err(response) = check_user_id(&user_id) {
        return response;
    }

    let profile = match load_profile(&state, &user_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let traits = extract_traits(&profile).all();
    let summary = generate_summary(&profile, &mut rand::thread_rng());

    HttpResponse::Ok().json(SummaryResponse {
        user_id,
        summary,
        traits,
    })
}

/// Avatar for a user id; needs no backend lookup
///
/// GET /api/v1/profiles/{id}/avatar
async fn get_avatar(path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    let avatar = generate_avatar(&user_id).to_string();

    HttpResponse::Ok().json(AvatarResponse { user_id, avatar })
}
