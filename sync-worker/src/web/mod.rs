//! Web server module for handling the inbound identity webhook.
//!
//! This module provides a thin web server that:
//! - Receives user lifecycle webhooks from Clerk (delivered via Svix)
//! - Verifies the payload signature over the exact raw body bytes
//! - Applies each event to the user store
//! - Responds with a plain status

pub mod handlers;
pub mod signature;

pub use handlers::{clerk_webhook, health, AppState, HealthResponse, WebhookResponse};
pub use signature::{decode_secret, verify_webhook_signature, SECRET_PREFIX};
