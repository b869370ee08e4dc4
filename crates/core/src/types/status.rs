//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a placed order.
///
/// Every order starts as `Accepted` and is moved forward one step at a time
/// by the fulfillment workflow. `Ready` covers both pickup and delivery
/// handoff. `Completed` and `Cancelled` are terminal: once an order reaches
/// either, no further transition is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order persisted at checkout, awaiting the kitchen.
    Accepted,
    /// The kitchen is working on it.
    Preparing,
    /// Ready for pickup or out for delivery.
    Ready,
    /// Handed off to the customer.
    Completed,
    /// Abandoned before completion.
    Cancelled,
}

impl OrderStatus {
    /// Whether any further transition out of this state is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the fulfillment workflow may move an order from `self` to
    /// `next`.
    ///
    /// Forward transitions advance exactly one step; `Cancelled` is reachable
    /// from any non-terminal state. Terminal states accept nothing.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Accepted, Self::Preparing)
            | (Self::Preparing, Self::Ready)
            | (Self::Ready, Self::Completed) => true,
            (_, Self::Cancelled) => !self.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Preparing => write!(f, "preparing"),
            Self::Ready => write!(f, "ready"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accepted),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
