//! Article models.
//!
//! An article is a message or note attached to a ticket. The adapter
//! inspects `id` and `ticket_id` (collections are filtered client-side on
//! the latter because some backends return articles unscoped) and passes
//! everything else through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message or note attached to a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique article ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// ID of the ticket this article belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<u64>,

    /// All remaining backend fields, passed through unchanged.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Article {
    /// Returns a backend field by name, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the article belongs to the given ticket.
    pub fn belongs_to(&self, ticket_id: u64) -> bool {
        self.ticket_id == Some(ticket_id)
    }
}

/// Builder for a message posted to a ticket.
///
/// Produces the parameter set sent to the backend: `ticket_id`, `body`, and
/// `internal` are always present; subject, author, and article type are
/// included when set; extra fields are merged last and may override any of
/// the above.
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    body: String,
    subject: Option<String>,
    author_id: Option<u64>,
    internal: bool,
    article_type: Option<String>,
    extra: Map<String, Value>,
}

impl MessageDraft {
    /// Creates a draft with the given message body.
    pub fn new(body: impl Into<String>) -> Self {
        MessageDraft {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Sets the subject line.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the authoring user id.
    #[must_use]
    pub fn with_author_id(mut self, author_id: u64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Marks the message as internal (not visible to the customer).
    #[must_use]
    pub fn internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    /// Sets the article type (e.g., "note", "email").
    #[must_use]
    pub fn with_article_type(mut self, article_type: impl Into<String>) -> Self {
        self.article_type = Some(article_type.into());
        self
    }

    /// Adds an extra backend parameter, passed through verbatim.
    #[must_use]
    pub fn with_extra_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Assembles the backend parameter set for the given ticket.
    pub fn into_params(self, ticket_id: u64) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("ticket_id".to_string(), Value::from(ticket_id));
        params.insert("body".to_string(), Value::String(self.body));
        params.insert("internal".to_string(), Value::Bool(self.internal));
        if let Some(subject) = self.subject {
            params.insert("subject".to_string(), Value::String(subject));
        }
        if let Some(author_id) = self.author_id {
            params.insert("author_id".to_string(), Value::from(author_id));
        }
        if let Some(article_type) = self.article_type {
            params.insert("type".to_string(), Value::String(article_type));
        }
        // Extra fields win over the built-ins.
        for (name, value) in self.extra {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_article_deserialize() {
        let json = r#"{"id": 3, "ticket_id": 42, "body": "hello", "sender_id": 1}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, Some(3));
        assert!(article.belongs_to(42));
        assert!(!article.belongs_to(43));
        assert_eq!(article.field("body"), Some(&Value::from("hello")));
    }

    #[test]
    fn test_article_missing_ticket_id_belongs_nowhere() {
        let article: Article = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(!article.belongs_to(42));
    }

    #[test]
    fn test_draft_minimal_params() {
        let params = MessageDraft::new("ping").into_params(7);
        assert_eq!(params.get("ticket_id"), Some(&Value::from(7)));
        assert_eq!(params.get("body"), Some(&Value::from("ping")));
        assert_eq!(params.get("internal"), Some(&Value::Bool(false)));
        assert!(!params.contains_key("subject"));
        assert!(!params.contains_key("author_id"));
        assert!(!params.contains_key("type"));
    }

    #[test]
    fn test_draft_full_params() {
        let params = MessageDraft::new("body text")
            .with_subject("Re: outage")
            .with_author_id(12)
            .internal(true)
            .with_article_type("note")
            .into_params(7);
        assert_eq!(params.get("subject"), Some(&Value::from("Re: outage")));
        assert_eq!(params.get("author_id"), Some(&Value::from(12)));
        assert_eq!(params.get("internal"), Some(&Value::Bool(true)));
        assert_eq!(params.get("type"), Some(&Value::from("note")));
    }

    #[test]
    fn test_draft_extra_fields_override() {
        let params = MessageDraft::new("body text")
            .with_extra_field("internal", Value::Bool(true))
            .with_extra_field("to", Value::from("user@example.com"))
            .into_params(7);
        assert_eq!(params.get("internal"), Some(&Value::Bool(true)));
        assert_eq!(params.get("to"), Some(&Value::from("user@example.com")));
    }
}
