//! UserSync - Clerk-to-Postgres user synchronization.
//!
//! This library backs the `usersync` binary, a thin webhook receiver
//! that keeps a local `users` table in sync with a Clerk instance:
//!
//! ```text
//! Clerk (Svix) → POST /webhooks/clerk → verify signature → dispatch → Postgres
//! ```
//!
//! Each delivery is handled in a single pass: verify, parse, issue at
//! most one datastore call, respond. Delivery retries are the
//! provider's responsibility.

pub mod config;
pub mod events;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use events::WebhookEvent;
pub use store::{NewUser, PgUserStore, StoreError, User, UserStore, UserUpdate};
pub use web::AppState;
