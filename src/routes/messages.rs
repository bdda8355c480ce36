use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{backend_failure, bad_request, check_user_id, validation_failed, AppState};
use crate::models::{ErrorResponse, Message, MessageResponse, MessagesResponse, SendMessageRequest};

/// Configure messaging routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/messages", web::post().to(send_message))
        .route("/messages/{user_id}/{other_user_id}", web::get().to(list_messages));
}

/// Only mutually matched users may talk to each other
async fn require_match(state: &AppState, user_id: &str, other_user_id: &str) -> Result<(), HttpResponse> {
    match state.backend.is_mutual_match(user_id, other_user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(HttpResponse::Forbidden().json(ErrorResponse::new(
            "Forbidden",
            "Match not found or access denied",
            403,
        ))),
        Err(e) => {
            tracing::error!("Failed to verify match {} <-> {}: {}", user_id, other_user_id, e);
            Err(backend_failure("Failed to verify match", &e))
        }
    }
}

/// Send a message to a mutual match
///
/// POST /api/v1/messages
///
/// Request body:
/// ```json
/// {
///   "senderId": "string",
///   "receiverId": "string",
///   "content": "string"
/// }
/// ```
async fn send_message(state: web::Data<AppState>, req: web::Json<SendMessageRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let content = req.content.trim();
    if content.is_empty() {
        return bad_request("Invalid content", "Message content cannot be empty");
    }

    if req.sender_id == req.receiver_id {
        return bad_request("Invalid target", "Users cannot message themselves");
    }

    if let Err(response) = require_match(&state, &req.sender_id, &req.receiver_id).await {
        return response;
    }

    let message = Message {
        id: None,
        sender_id: req.sender_id.clone(),
        receiver_id: req.receiver_id.clone(),
        content: content.to_string(),
        created_at: None,
    };

    match state.backend.send_message(&message).await {
        Ok(message) => {
            tracing::info!("Message sent from {} to {}", message.sender_id, message.receiver_id);
            HttpResponse::Ok().json(MessageResponse { message })
        }
        Err(e) => {
            tracing::error!("Failed to send message: {}", e);
            backend_failure("Failed to send message", &e)
        }
    }
}

/// Conversation between two mutual matches
///
/// GET /api/v1/messages/{userId}/{otherUserId}
async fn list_messages(state: web::Data<AppState>, path: web::Path<(String, String)>) -> impl Responder {
    let (user_id, other_user_id) = path.into_inner();
    for id in [&user_id, &other_user_id] {
        if let Err(response) = check_user_id(id) {
            return response;
        }
    }

    if let Err(response) = require_match(&state, &user_id, &other_user_id).await {
        return response;
    }

    match state.backend.list_messages(&user_id, &other_user_id).await {
        Ok(messages) => HttpResponse::Ok().json(MessagesResponse { messages }),
        Err(e) => {
            tracing::error!("Failed to fetch messages for {} and {}: {}", user_id, other_user_id, e);
            backend_failure("Failed to fetch messages", &e)
        }
    }
}
