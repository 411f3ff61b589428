// Trigger evaluation for alert creation.
//
// Each trigger names a need that should become an alert. The dedup guard is
// applied here: a need that already has an active alert never triggers.

use std::collections::HashSet;

use crate::core::gauges::NeedGauges;
use crate::core::model::{Need, SignalEvent};

/// Why an alert is about to be raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTrigger {
    /// A growable need reached the alert threshold
    GaugeThreshold { need: Need, level: u8 },
    /// An Emergency signal arrived
    EmergencySignal,
}

impl AlertTrigger {
    pub fn need(&self) -> Need {
        match self {
            Self::GaugeThreshold { need, .. } => *need,
            Self::EmergencySignal => Need::Emergency,
        }
    }

    /// Message shown on the alert card
    pub fn message(&self) -> &'static str {
        match self.need() {
            Need::Food => "Patient may be hungry. Food need level is high.",
            Need::Water => "Patient may be thirsty. Water need level is high.",
            Need::Restroom => "Patient may need restroom. Restroom need level is high.",
            need => need.signal_message(),
        }
    }
}

/// Context provided to triggers for evaluation
pub struct TriggerContext<'a> {
    pub gauges: &'a NeedGauges,
    /// Level at or above which a growable need raises an alert
    pub threshold: u8,
    /// Needs that already have an undismissed alert
    pub active_needs: &'a HashSet<Need>,
}

/// Gauge triggers in Food, Water, Restroom order.
pub fn evaluate_thresholds(ctx: &TriggerContext) -> Vec<AlertTrigger> {
    Need::GROWABLE
        .iter()
        .filter(|need| !ctx.active_needs.contains(*need))
        .filter_map(|&need| {
            let level = ctx.gauges.level(need)?;
            (level >= ctx.threshold).then_some(AlertTrigger::GaugeThreshold { need, level })
        })
        .collect()
}

/// Direct passthrough for Emergency signals. Other needs go through the gauges.
pub fn evaluate_signal(event: &SignalEvent, active_needs: &HashSet<Need>) -> Option<AlertTrigger> {
    if event.need == Need::Emergency && !active_needs.contains(&Need::Emergency) {
        Some(AlertTrigger::EmergencySignal)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let gauges = NeedGauges { food: 80, water: 79, restroom: 100 };
        let active = HashSet::new();
        let ctx = TriggerContext { gauges: &gauges, threshold: 80, active_needs: &active };

        let triggers = evaluate_thresholds(&ctx);
        assert_eq!(
            triggers,
            vec![
                AlertTrigger::GaugeThreshold { need: Need::Food, level: 80 },
                AlertTrigger::GaugeThreshold { need: Need::Restroom, level: 100 },
            ]
        );
    }

    #[test]
    fn test_active_need_does_not_retrigger() {
        let gauges = NeedGauges { food: 95, water: 0, restroom: 0 };
        let active: HashSet<Need> = [Need::Food].into_iter().collect();
        let ctx = TriggerContext { gauges: &gauges, threshold: 80, active_needs: &active };
        assert!(evaluate_thresholds(&ctx).is_empty());
    }

    #[test]
    fn test_only_emergency_signals_pass_through() {
        let none = HashSet::new();
        assert_eq!(
            evaluate_signal(&SignalEvent::for_need(Need::Emergency), &none),
            Some(AlertTrigger::EmergencySignal)
        );
        assert_eq!(evaluate_signal(&SignalEvent::for_need(Need::Food), &none), None);
        assert_eq!(evaluate_signal(&SignalEvent::for_need(Need::Calm), &none), None);

        let active: HashSet<Need> = [Need::Emergency].into_iter().collect();
        assert_eq!(evaluate_signal(&SignalEvent::for_need(Need::Emergency), &active), None);
    }

    #[test]
    fn test_trigger_messages() {
        let food = AlertTrigger::GaugeThreshold { need: Need::Food, level: 80 };
        assert_eq!(food.message(), "Patient may be hungry. Food need level is high.");
        assert_eq!(
            AlertTrigger::EmergencySignal.message(),
            "Emergency assistance required immediately!"
        );
    }
}
