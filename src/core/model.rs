use std::fmt;

use serde::{Deserialize, Serialize};

/// A category of patient requirement the monitor can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Need {
    Food,
    Water,
    Restroom,
    Emergency,
    /// No need detected. Never produces an alert.
    Calm,
}

impl Need {
    /// Needs that accumulate a gauge level over time.
    pub const GROWABLE: [Need; 3] = [Need::Food, Need::Water, Need::Restroom];

    pub fn urgency(self) -> Urgency {
        match self {
            Self::Food | Self::Water => Urgency::Low,
            Self::Restroom => Urgency::Medium,
            Self::Emergency => Urgency::High,
            Self::Calm => Urgency::None,
        }
    }

    pub fn is_growable(self) -> bool {
        matches!(self, Self::Food | Self::Water | Self::Restroom)
    }

    /// Message attached to a detection event for this need.
    pub fn signal_message(self) -> &'static str {
        match self {
            Self::Emergency => "Emergency assistance required immediately!",
            Self::Restroom => "Patient requires restroom assistance.",
            Self::Food => "Patient has indicated a need for food.",
            Self::Water => "Patient has indicated a need for water.",
            Self::Calm => "Patient is calm. No immediate needs detected.",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Water => "Water",
            Self::Restroom => "Restroom",
            Self::Emergency => "Emergency",
            Self::Calm => "Calm",
        }
    }
}

impl fmt::Display for Need {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Severity attached to an alert, drives presentation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Calm,
    NeedsAttention,
    Emergency,
}

impl PatientStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::NeedsAttention => "Needs Attention",
            Self::Emergency => "Emergency",
        }
    }
}

/// One synthetic detection produced by the signal generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub need: Need,
    pub urgency: Urgency,
    pub message: String,
}

impl SignalEvent {
    /// Build the event for a need from the fixed urgency/message table.
    pub fn for_need(need: Need) -> Self {
        Self {
            need,
            urgency: need.urgency(),
            message: need.signal_message().to_string(),
        }
    }

    pub fn is_calm(&self) -> bool {
        self.need == Need::Calm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_table() {
        assert_eq!(Need::Food.urgency(), Urgency::Low);
        assert_eq!(Need::Water.urgency(), Urgency::Low);
        assert_eq!(Need::Restroom.urgency(), Urgency::Medium);
        assert_eq!(Need::Emergency.urgency(), Urgency::High);
        assert_eq!(Need::Calm.urgency(), Urgency::None);
    }

    #[test]
    fn test_only_three_needs_grow() {
        for need in Need::GROWABLE {
            assert!(need.is_growable());
        }
        assert!(!Need::Emergency.is_growable());
        assert!(!Need::Calm.is_growable());
    }

    #[test]
    fn test_signal_event_uses_lookup_table() {
        let event = SignalEvent::for_need(Need::Emergency);
        assert_eq!(event.urgency, Urgency::High);
        assert_eq!(event.message, "Emergency assistance required immediately!");
        assert!(!event.is_calm());
        assert!(SignalEvent::for_need(Need::Calm).is_calm());
    }
}
