//! Chat messages referenced by tickets.
//!
//! Every ticket points at the message that raised it and at a list of
//! context messages posted around it. Messages are read-only from the
//! dashboard's point of view.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MessageId
// ---------------------------------------------------------------------------

/// Backend identifier of a message.
///
/// # Examples
///
/// ```
/// use triage_models::MessageId;
///
/// let id = MessageId::new("1062740135117901884");
/// assert_eq!(id.to_string(), "1062740135117901884");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new message identifier.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for MessageId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

/// Author of a message.
///
/// Only `nickname` and `is_bot` are rendered; the remaining fields are kept
/// when the backend sends them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Author {
    /// Backend identifier of the author.
    #[serde(default)]
    pub id: Option<String>,
    /// Account name.
    #[serde(default)]
    pub name: Option<String>,
    /// Display name.
    pub nickname: String,
    /// Hex colour of the author.
    #[serde(default)]
    pub color: Option<String>,
    /// Discriminator suffix of the account name.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Whether the account is a bot.
    pub is_bot: bool,
    /// When the backend first recorded the author.
    #[serde(default, with = "crate::timestamp::option")]
    pub timestamp_insert: Option<DateTime<Utc>>,
}

impl Author {
    /// Minimal author with just the rendered fields.
    pub fn new(nickname: &str, is_bot: bool) -> Self {
        Self {
            id: None,
            name: None,
            nickname: nickname.to_string(),
            color: None,
            discriminator: None,
            avatar_url: None,
            is_bot,
            timestamp_insert: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A chat message, either the source of a ticket or one of its context
/// messages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    /// Backend identifier.
    pub id: MessageId,
    /// Channel the message was posted in.
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Parent channel, for threads.
    #[serde(default)]
    pub parent_channel_id: Option<String>,
    /// Community server the channel belongs to.
    #[serde(default)]
    pub community_server_id: Option<String>,
    /// When the message was posted.
    #[serde(default, with = "crate::timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Whether the message carries an attachment.
    #[serde(default)]
    pub has_attachment: bool,
    /// Message this one replies to.
    #[serde(default)]
    pub reference_msg_id: Option<MessageId>,
    /// When the backend ingested the message.
    #[serde(with = "crate::timestamp")]
    pub timestamp_insert: DateTime<Utc>,
    /// Discussion the message belongs to.
    #[serde(default)]
    pub discussion_id: Option<String>,
    /// Identifier of the author.
    #[serde(default)]
    pub author_id: Option<String>,
    /// Text content.
    pub content: String,
    /// Link to the message on its source platform.
    pub msg_url: String,
    /// Author details.
    pub author: Author,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_MESSAGE: &str = r##"{
        "id": "m-1",
        "channel_id": "c-1",
        "parent_channel_id": null,
        "community_server_id": "s-1",
        "timestamp": "2023-05-04T10:00:00",
        "has_attachment": true,
        "reference_msg_id": null,
        "timestamp_insert": "2023-05-04T10:00:05",
        "discussion_id": null,
        "author_id": "a-1",
        "content": "my wallet got drained",
        "msg_url": "https://chat.example.com/c-1/m-1",
        "author": {
            "id": "a-1",
            "name": "alice",
            "nickname": "Alice",
            "color": "#ffffff",
            "discriminator": "0001",
            "avatar_url": "https://cdn.example.com/a-1.png",
            "is_bot": false,
            "timestamp_insert": "2023-01-01T00:00:00"
        }
    }"##;

    #[test]
    fn message_id_display_and_equality() {
        let a = MessageId::new("m-1");
        let b: MessageId = "m-1".into();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "m-1");
    }

    #[test]
    fn deserializes_full_backend_message() {
        let msg: Message = serde_json::from_str(BACKEND_MESSAGE).unwrap();
        assert_eq!(msg.id, MessageId::new("m-1"));
        assert!(msg.has_attachment);
        assert_eq!(msg.author.nickname, "Alice");
        assert!(!msg.author.is_bot);
        assert!(msg.timestamp.is_some());
        assert_eq!(msg.discussion_id, None);
    }

    #[test]
    fn deserializes_minimal_message() {
        let msg: Message = serde_json::from_str(
            r#"{
                "id": "m-2",
                "timestamp_insert": "2023-05-04T10:00:05Z",
                "content": "hi",
                "msg_url": "https://chat.example.com/m-2",
                "author": {"nickname": "HelperBot", "is_bot": true}
            }"#,
        )
        .unwrap();
        assert!(!msg.has_attachment);
        assert!(msg.author.is_bot);
        assert_eq!(msg.author, Author::new("HelperBot", true));
    }

    #[test]
    fn missing_author_is_an_error() {
        let res = serde_json::from_str::<Message>(
            r#"{"id": "m", "timestamp_insert": "2023-05-04T10:00:05", "content": "", "msg_url": ""}"#,
        );
        assert!(res.is_err());
    }
}
