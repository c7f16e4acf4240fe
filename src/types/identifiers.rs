//! Identifier types for the fulfillment simulator
//!
//! This module contains the order identifier (UUID based) and the worker
//! identifier used throughout the simulation system.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::{Builder, Uuid};

/// Unique identifier for an order
///
/// Stored as the hyphenated UUID text. Generated identifiers are built from
/// bytes drawn off the run's seeded generator so that a seed reproduces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Create a new random order ID from OS entropy
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build a version 4 order ID from caller supplied random bytes
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(OrderId)
    }
}

impl Serialize for OrderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of a warehouse worker from the configured pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl WorkerId {
    /// Create a worker ID from its label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_creation() {
        let id1 = OrderId::new();
        let id2 = OrderId::new();

        // IDs should be unique
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_order_id_from_bytes_is_stable() {
        let bytes = [7u8; 16];
        let id1 = OrderId::from_random_bytes(bytes);
        let id2 = OrderId::from_random_bytes(bytes);

        assert_eq!(id1, id2);
        assert_eq!(id1.0.get_version_num(), 4);
    }

    #[test]
    fn test_order_id_text_round_trip() {
        let id = OrderId::from_random_bytes([42u8; 16]);
        let text = id.to_string();

        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<OrderId>().unwrap(), id);
        assert!("not-a-uuid".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_order_id_serialization() {
        let id = OrderId::from_random_bytes([1u8; 16]);
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, format!("\"{}\"", id));
        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_worker_id_is_transparent() {
        let worker = WorkerId::from("W3");
        assert_eq!(worker.to_string(), "W3");
        assert_eq!(serde_json::to_string(&worker).unwrap(), "\"W3\"");
    }
}
