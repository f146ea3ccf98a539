//! Ticket models.
//!
//! `Ticket` is a backend-originated record passed through largely unchanged;
//! `TicketDetail` is the adapter-built consolidated view of a ticket, its
//! articles, and per-article attachment metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Article, Attachment};

/// A ticket record.
///
/// Only the identifier is inspected by the adapter; all other backend
/// fields ride along in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// All remaining backend fields, passed through unchanged.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Ticket {
    /// Builds the stand-in record used when a ticket fetch fails: it carries
    /// the requested id and a description of the failure, so a detail view
    /// can always be returned.
    pub fn placeholder(id: u64, error: impl fmt::Display) -> Self {
        let mut fields = Map::new();
        fields.insert("error".to_string(), Value::String(error.to_string()));
        Ticket {
            id: Some(id),
            fields,
        }
    }

    /// Returns a backend field by name, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the ticket title or a placeholder.
    pub fn display_title(&self) -> &str {
        self.field("title")
            .and_then(Value::as_str)
            .unwrap_or("(No title)")
    }
}

/// Consolidated view of a ticket: the ticket record, its articles, and
/// attachment metadata keyed by article id.
///
/// The `ticket` field is always present; a failed fetch is represented by
/// [`Ticket::placeholder`], never by an absent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDetail {
    /// The ticket record, or a placeholder describing the fetch failure.
    pub ticket: Ticket,

    /// Articles belonging to the ticket, in backend order.
    pub articles: Vec<Article>,

    /// Discovered attachments per article id.
    pub attachments: BTreeMap<u64, Vec<Attachment>>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ticket_deserialize_keeps_unknown_fields() {
        let json = r#"{
            "id": 42,
            "title": "Printer on fire",
            "state_id": 1,
            "customer_id": 7
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, Some(42));
        assert_eq!(ticket.display_title(), "Printer on fire");
        assert_eq!(ticket.field("state_id"), Some(&Value::from(1)));
        assert_eq!(ticket.field("customer_id"), Some(&Value::from(7)));
    }

    #[test]
    fn test_ticket_roundtrip_preserves_fields() {
        let json = serde_json::json!({"id": 9, "title": "t", "group_id": 3});
        let ticket: Ticket = serde_json::from_value(json.clone()).unwrap();
        let back = serde_json::to_value(&ticket).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_placeholder_carries_id_and_error() {
        let ticket = Ticket::placeholder(17, "HTTP 500 Internal Server Error");
        assert_eq!(ticket.id, Some(17));
        assert_eq!(
            ticket.field("error").and_then(Value::as_str),
            Some("HTTP 500 Internal Server Error")
        );
    }

    #[test]
    fn test_display_title_missing() {
        let ticket = Ticket {
            id: Some(1),
            fields: Map::new(),
        };
        assert_eq!(ticket.display_title(), "(No title)");
    }

    #[test]
    fn test_detail_serializes_attachment_map_by_article_id() {
        let mut attachments = BTreeMap::new();
        attachments.insert(5, vec![]);
        let detail = TicketDetail {
            ticket: Ticket::placeholder(1, "gone"),
            articles: vec![],
            attachments,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert!(value["attachments"]["5"].is_array());
    }
}
