// Alert record types shared with the rendering boundary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::{Need, Urgency};

/// Identifier assigned by the alert engine. Later alerts get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub u64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A surfaced, dismissible need. Never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub need: Need,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub urgency: Urgency,
}

impl Alert {
    pub fn is_emergency(&self) -> bool {
        self.need == Need::Emergency
    }
}
