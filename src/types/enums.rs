//! Enumeration types for the fulfillment simulator
//!
//! This module contains the categorical values stored with every order and
//! fulfillment event, plus the report output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fulfillment method chosen when the order is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// Buy online, pick up in store
    #[serde(rename = "BOPIS")]
    Bopis,
    /// Local home delivery
    Delivery,
    /// Parcel shipment to the customer's address
    ShipToHome,
}

impl Channel {
    /// Every channel, in the order the generator draws from
    pub const ALL: [Channel; 3] = [Channel::Bopis, Channel::Delivery, Channel::ShipToHome];

    /// Text stored in the event store for this channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Bopis => "BOPIS",
            Channel::Delivery => "Delivery",
            Channel::ShipToHome => "ShipToHome",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bopis" | "pickup" => Ok(Channel::Bopis),
            "delivery" => Ok(Channel::Delivery),
            "shiptohome" | "ship to home" | "ship" => Ok(Channel::ShipToHome),
            _ => Err(format!("Unknown channel: {}", s)),
        }
    }
}

/// Terminal outcome of a fulfillment event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FulfillmentStatus {
    /// Delivered and not reported late
    Completed,
    /// Delivered after the due time and flagged as late
    Late,
    /// Canceled after an out-of-stock pick; never delivered
    Canceled,
}

impl FulfillmentStatus {
    /// Every status
    pub const ALL: [FulfillmentStatus; 3] =
        [FulfillmentStatus::Completed, FulfillmentStatus::Late, FulfillmentStatus::Canceled];

    /// Text stored in the event store for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Completed => "Completed",
            FulfillmentStatus::Late => "Late",
            FulfillmentStatus::Canceled => "Canceled",
        }
    }

    /// Whether an order in this status reached the customer
    pub fn is_delivered(&self) -> bool {
        !matches!(self, FulfillmentStatus::Canceled)
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" | "complete" => Ok(FulfillmentStatus::Completed),
            "late" => Ok(FulfillmentStatus::Late),
            "canceled" | "cancelled" => Ok(FulfillmentStatus::Canceled),
            _ => Err(format!("Unknown fulfillment status: {}", s)),
        }
    }
}

/// Output format options for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human readable text tables
    Text,
    /// JSON document for downstream tooling
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "TEXT"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_display_matches_stored_text() {
        assert_eq!(format!("{}", Channel::Bopis), "BOPIS");
        assert_eq!(format!("{}", Channel::Delivery), "Delivery");
        assert_eq!(format!("{}", Channel::ShipToHome), "ShipToHome");
    }

    #[test]
    fn test_channel_from_str() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        assert_eq!("ship to home".parse::<Channel>().unwrap(), Channel::ShipToHome);
        assert_eq!("pickup".parse::<Channel>().unwrap(), Channel::Bopis);

        // Test error case
        assert!("drone".parse::<Channel>().is_err());
    }

    #[test]
    fn test_status_from_str() {
        for status in FulfillmentStatus::ALL {
            assert_eq!(status.as_str().parse::<FulfillmentStatus>().unwrap(), status);
        }
        assert_eq!("cancelled".parse::<FulfillmentStatus>().unwrap(), FulfillmentStatus::Canceled);
        assert!("lost".parse::<FulfillmentStatus>().is_err());
    }

    #[test]
    fn test_status_delivery() {
        assert!(FulfillmentStatus::Completed.is_delivered());
        assert!(FulfillmentStatus::Late.is_delivered());
        assert!(!FulfillmentStatus::Canceled.is_delivered());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);

        // Test error case
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_enum_serialization() {
        let json = serde_json::to_string(&Channel::Bopis).unwrap();
        assert_eq!(json, "\"BOPIS\"");
        let deserialized: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Channel::Bopis);

        let json = serde_json::to_string(&FulfillmentStatus::Late).unwrap();
        let deserialized: FulfillmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, FulfillmentStatus::Late);
    }
}
