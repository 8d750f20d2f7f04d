//! Webhook endpoint handlers.
//!
//! The webhook handler makes exactly one pass over each delivery:
//! 1. Verify the Svix signature over the exact raw body bytes
//! 2. Parse the event envelope and dispatch on its type
//! 3. Issue at most one datastore call and answer with a status
//!
//! No error is retried internally; redelivery is the provider's
//! responsibility. Signature failures are logged server-side and never
//! detailed in the response body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::events::WebhookEvent;
use crate::store::{NewUser, StoreError, UserStore, UserUpdate};
use crate::web::signature::verify_webhook_signature;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Clerk Webhook
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Clerk webhook endpoint.
///
/// Requires the three Svix headers (`svix-id`, `svix-timestamp`,
/// `svix-signature`). After verification the body is parsed as an event
/// envelope and each branch issues a single call against the user store.
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let (msg_id, timestamp, signature) = match svix_headers(&headers) {
        Some(values) => values,
        None => {
            warn!("clerk_webhook_missing_headers");
            return (
                StatusCode::BAD_REQUEST,
                Json(WebhookResponse {
                    status: "missing svix headers",
                    user_id: None,
                }),
            );
        }
    };

    if !verify_webhook_signature(
        &state.config.webhook_secret,
        msg_id,
        timestamp,
        signature,
        &body,
        state.config.signature_max_age,
    ) {
        warn!(msg_id = %msg_id, "clerk_webhook_invalid_signature");
        return (
            StatusCode::BAD_REQUEST,
            Json(WebhookResponse {
                status: "invalid signature",
                user_id: None,
            }),
        );
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, msg_id = %msg_id, "clerk_webhook_malformed_payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(WebhookResponse {
                    status: "malformed payload",
                    user_id: None,
                }),
            );
        }
    };

    match event {
        WebhookEvent::UserCreated { data } => {
            let username = match data.username {
                Some(username) => username,
                None => {
                    warn!(clerk_id = %data.id, "clerk_webhook_missing_username");
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(WebhookResponse {
                            status: "missing username",
                            user_id: Some(data.id),
                        }),
                    );
                }
            };

            // displayName defaults to the username at creation time
            let new_user = NewUser {
                clerk_id: data.id.clone(),
                display_name: username.clone(),
                username,
                avatar_url: data.image_url,
            };

            match state.store.create(&new_user).await {
                Ok(user) => {
                    info!(clerk_id = %user.clerk_id, username = %user.username, "user_created");
                    (
                        StatusCode::OK,
                        Json(WebhookResponse {
                            status: "created",
                            user_id: Some(user.clerk_id),
                        }),
                    )
                }
                Err(e) => {
                    error!(error = %e, clerk_id = %data.id, "user_create_failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(WebhookResponse {
                            status: "error creating user",
                            user_id: Some(data.id),
                        }),
                    )
                }
            }
        }

        WebhookEvent::UserUpdated { data } => {
            let username = match data.username {
                Some(username) => username,
                None => {
                    warn!(clerk_id = %data.id, "clerk_webhook_missing_username");
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(WebhookResponse {
                            status: "missing username",
                            user_id: Some(data.id),
                        }),
                    );
                }
            };

            let update = UserUpdate {
                username,
                avatar_url: data.image_url,
            };

            match state.store.update(&data.id, &update).await {
                Ok(user) => {
                    info!(clerk_id = %user.clerk_id, username = %user.username, "user_updated");
                    (
                        StatusCode::OK,
                        Json(WebhookResponse {
                            status: "updated",
                            user_id: Some(user.clerk_id),
                        }),
                    )
                }
                Err(StoreError::NotFound) => {
                    warn!(clerk_id = %data.id, "user_update_not_found");
                    (
                        StatusCode::NOT_FOUND,
                        Json(WebhookResponse {
                            status: "user not found",
                            user_id: Some(data.id),
                        }),
                    )
                }
                Err(e) => {
                    error!(error = %e, clerk_id = %data.id, "user_update_failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(WebhookResponse {
                            status: "error updating user",
                            user_id: Some(data.id),
                        }),
                    )
                }
            }
        }

        WebhookEvent::UserDeleted { data } => match state.store.delete(&data.id).await {
            Ok(existed) => {
                if existed {
                    info!(clerk_id = %data.id, "user_deleted");
                } else {
                    // Already absent; the delete is considered satisfied
                    warn!(clerk_id = %data.id, "user_delete_not_found");
                }
                (
                    StatusCode::OK,
                    Json(WebhookResponse {
                        status: "deleted",
                        user_id: Some(data.id),
                    }),
                )
            }
            Err(e) => {
                error!(error = %e, clerk_id = %data.id, "user_delete_failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(WebhookResponse {
                        status: "error deleting user",
                        user_id: Some(data.id),
                    }),
                )
            }
        },

        WebhookEvent::Unknown => {
            info!(msg_id = %msg_id, "clerk_webhook_ignored_event");
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "ignored",
                    user_id: None,
                }),
            )
        }
    }
}

/// Extract the three required Svix headers, if all are present and ASCII.
fn svix_headers(headers: &HeaderMap) -> Option<(&str, &str, &str)> {
    let msg_id = headers.get("svix-id")?.to_str().ok()?;
    let timestamp = headers.get("svix-timestamp")?.to_str().ok()?;
    let signature = headers.get("svix-signature")?.to_str().ok()?;
    Some((msg_id, timestamp, signature))
}
