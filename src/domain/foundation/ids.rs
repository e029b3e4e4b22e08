//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for an analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Declares a non-empty string identifier with a sequential constructor.
macro_rules! labelled_id {
    ($(#[$meta:meta])* $name:ident, $field:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used for sequentially assigned identifiers.
            pub const PREFIX: &'static str = $prefix;

            /// Creates an identifier from caller-supplied text, rejecting blanks.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Creates the sequential identifier for position `n` (1-based).
            pub fn sequential(n: u32) -> Self {
                Self(format!("{}{}", Self::PREFIX, n))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

labelled_id!(
    /// Identifier of an evidence item (`E1`, `E2`, ... unless caller-supplied).
    EvidenceId,
    "id",
    "E"
);

labelled_id!(
    /// Identifier of a hypothesis (`H1`, `H2`, ... unless caller-supplied).
    HypothesisId,
    "id",
    "H"
);

labelled_id!(
    /// Identifier the sampling peer attaches to a proposed tool call.
    ToolCallId,
    "tool_call_id",
    "call_"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_round_trips_through_display() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn sequential_ids_use_prefix() {
        assert_eq!(EvidenceId::sequential(3).as_str(), "E3");
        assert_eq!(HypothesisId::sequential(1).as_str(), "H1");
        assert_eq!(ToolCallId::sequential(7).as_str(), "call_7");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(EvidenceId::new("   ").is_err());
        assert!(HypothesisId::new("").is_err());
    }

    #[test]
    fn caller_ids_are_trimmed() {
        let id = EvidenceId::new("  heap-1 ").unwrap();
        assert_eq!(id.as_str(), "heap-1");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&HypothesisId::sequential(2)).unwrap();
        assert_eq!(json, "\"H2\"");
    }
}
