use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{bad_request, backend_failure, invalidate_decks, validation_failed, AppState};
use crate::models::{BlockRecord, BlockRequest, BlockResponse, Report, ReportReason, ReportRequest, ReportResponse};

/// Configure block and report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/blocks", web::post().to(block_user))
        .route("/reports", web::post().to(report_user));
}

/// Block a user
///
/// POST /api/v1/blocks
///
/// Removes any swipes between the two users once the block is stored.
async fn block_user(state: web::Data<AppState>, req: web::Json<BlockRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    if req.blocker_id == req.blocked_user_id {
        return bad_request("Invalid target", "Users cannot block themselves");
    }

    let block = BlockRecord {
        blocker_id: req.blocker_id.clone(),
        blocked_id: req.blocked_user_id.clone(),
    };

    if let Err(e) = state.backend.block_user(&block).await {
        tracing::error!("Failed to block user: {}", e);
        return backend_failure("Failed to block user", &e);
    }

    // The block stands even if the cleanup fails
    if let Err(e) = state
        .backend
        .delete_swipes_between(&req.blocker_id, &req.blocked_user_id)
        .await
    {
        tracing::warn!("Block stored but removing swipes failed: {}", e);
    }

    invalidate_decks(&state, &req.blocker_id).await;
    invalidate_decks(&state, &req.blocked_user_id).await;

    tracing::info!("User {} blocked {}", req.blocker_id, req.blocked_user_id);

    HttpResponse::Ok().json(BlockResponse { success: true })
}

/// Report a user
///
/// POST /api/v1/reports
///
/// Request body:
/// ```json
/// {
///   "reporterId": "string",
///   "reportedUserId": "string",
///   "reason": "inappropriate_content|harassment|fake_profile|spam|underage|inappropriate_behavior|other",
///   "description": "string"
/// }
/// ```
async fn report_user(state: web::Data<AppState>, req: web::Json<ReportRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let reason: ReportReason = match req.reason.parse() {
        Ok(reason) => reason,
        Err(_) => {
            let allowed = ReportReason::ALL
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return bad_request("Invalid reason", format!("Reason must be one of: {}", allowed));
        }
    };

    if req.reporter_id == req.reported_user_id {
        return bad_request("Invalid target", "Users cannot report themselves");
    }

    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let report = Report {
        id: Some(uuid::Uuid::new_v4().to_string()),
        reporter_id: req.reporter_id.clone(),
        reported_user_id: req.reported_user_id.clone(),
        reason,
        description,
        created_at: None,
    };

    match state.backend.create_report(&report).await {
        Ok(stored) => {
            tracing::info!(
                "Report {} filed by {} against {} ({})",
                stored.id.as_deref().unwrap_or("-"),
                stored.reporter_id,
                stored.reported_user_id,
                stored.reason.as_str()
            );
            HttpResponse::Ok().json(ReportResponse {
                success: true,
                report: stored,
            })
        }
        Err(e) => {
            tracing::error!("Failed to create report: {}", e);
            backend_failure("Failed to submit report", &e)
        }
    }
}
