//! # Delivery Error Types Module
//!
//! Error types produced by the messaging layer when an outbound message cannot
//! be delivered. Transport-specific failures are folded into a small set of
//! kinds so the fan-out logic never depends on a client library's error types.

/// Broad category of a failed delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// Recipient blocked the bot, left, or cannot be messaged
    Unreachable,
    /// Chat or user does not exist
    NotFound,
    /// The request itself was rejected (text too long, bad markup, missing chat rights)
    Malformed,
    /// Network, I/O, flood control or anything else
    Other,
}

impl std::fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeliveryErrorKind::Unreachable => "Unreachable",
            DeliveryErrorKind::NotFound => "NotFound",
            DeliveryErrorKind::Malformed => "Malformed",
            DeliveryErrorKind::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A single failed delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryError {
    pub kind: DeliveryErrorKind,
    pub description: String,
}

impl DeliveryError {
    pub fn new(kind: DeliveryErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn unreachable(description: impl Into<String>) -> Self {
        Self::new(DeliveryErrorKind::Unreachable, description)
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(DeliveryErrorKind::NotFound, description)
    }

    pub fn malformed(description: impl Into<String>) -> Self {
        Self::new(DeliveryErrorKind::Malformed, description)
    }

    pub fn other(description: impl Into<String>) -> Self {
        Self::new(DeliveryErrorKind::Other, description)
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.description)
    }
}

impl std::error::Error for DeliveryError {}
