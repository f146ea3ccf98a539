//! Priority models.
//!
//! Priorities are only handled transiently, to resolve a human-readable
//! name to the id the backend wants in ticket updates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A ticket priority record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    /// Unique priority ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Priority name (e.g., "2 normal").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// All remaining backend fields, passed through unchanged.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Priority {
    /// Case-insensitive name match.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.to_lowercase() == name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_deserialize() {
        let priority: Priority =
            serde_json::from_str(r#"{"id": 3, "name": "3 high", "active": true}"#).unwrap();
        assert_eq!(priority.id, Some(3));
        assert_eq!(priority.name.as_deref(), Some("3 high"));
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        let priority: Priority = serde_json::from_str(r#"{"id": 3, "name": "urgent"}"#).unwrap();
        assert!(priority.matches_name("Urgent"));
        assert!(priority.matches_name("URGENT"));
        assert!(!priority.matches_name("low"));
    }

    #[test]
    fn test_matches_name_absent() {
        let priority: Priority = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(!priority.matches_name("urgent"));
    }
}
