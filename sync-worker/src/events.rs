//! Webhook event envelope types.
//!
//! Clerk delivers events as a JSON envelope with a `type` tag and a
//! `data` payload. Only the three user lifecycle events are acted on;
//! everything else deserializes into [`WebhookEvent::Unknown`] and is
//! acknowledged without touching the datastore.

use serde::Deserialize;

/// Inbound webhook event, dispatched on the envelope's `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEvent {
    /// A user was created in the identity provider.
    #[serde(rename = "user.created")]
    UserCreated { data: UserPayload },
    /// A user's profile changed.
    #[serde(rename = "user.updated")]
    UserUpdated { data: UserPayload },
    /// A user was removed from the identity provider.
    #[serde(rename = "user.deleted")]
    UserDeleted { data: DeletedUserPayload },
    /// Any event type this service does not handle.
    #[serde(other)]
    Unknown,
}

/// Payload for `user.created` and `user.updated` events.
///
/// Field names match the provider's payload; unrecognized fields are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    /// Provider-issued external identifier
    pub id: String,
    /// Username; required for create/update, enforced by the handler
    #[serde(default)]
    pub username: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Payload for `user.deleted` events.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedUserPayload {
    /// Provider-issued external identifier
    pub id: String,
    /// Tombstone marker sent by the provider
    #[serde(default)]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_created_event() {
        let json = r#"{
            "type": "user.created",
            "data": {
                "id": "user_2abc",
                "username": "bob",
                "image_url": "https://img.example.com/a.png",
                "object": "user"
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        match event {
            WebhookEvent::UserCreated { data } => {
                assert_eq!(data.id, "user_2abc");
                assert_eq!(data.username.as_deref(), Some("bob"));
                assert_eq!(data.image_url.as_deref(), Some("https://img.example.com/a.png"));
            }
            _ => panic!("Expected UserCreated variant"),
        }
    }

    #[test]
    fn test_user_updated_missing_username() {
        let json = r#"{"type":"user.updated","data":{"id":"user_2abc","image_url":null}}"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        match event {
            WebhookEvent::UserUpdated { data } => {
                assert_eq!(data.id, "user_2abc");
                assert!(data.username.is_none());
                assert!(data.image_url.is_none());
            }
            _ => panic!("Expected UserUpdated variant"),
        }
    }

    #[test]
    fn test_user_deleted_event() {
        let json = r#"{"type":"user.deleted","data":{"id":"user_2abc","deleted":true,"object":"user"}}"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        match event {
            WebhookEvent::UserDeleted { data } => {
                assert_eq!(data.id, "user_2abc");
                assert!(data.deleted);
            }
            _ => panic!("Expected UserDeleted variant"),
        }
    }

    #[test]
    fn test_unrecognized_event_type() {
        let json = r#"{"type":"session.created","data":{"id":"sess_1"}}"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, WebhookEvent::Unknown));
    }

    #[test]
    fn test_missing_type_tag_is_an_error() {
        let json = r#"{"data":{"id":"user_2abc"}}"#;
        assert!(serde_json::from_str::<WebhookEvent>(json).is_err());
    }
}
