// Alert engine - owns the active alert list and its dedup guard.

use std::collections::HashSet;

use chrono::Utc;

use super::model::{Alert, AlertId};
use super::triggers::{evaluate_signal, evaluate_thresholds, AlertTrigger, TriggerContext};
use crate::core::gauges::NeedGauges;
use crate::core::model::{Need, SignalEvent};

pub const DEFAULT_ALERT_THRESHOLD: u8 = 80;

/// Alert engine state
pub struct AlertEngine {
    /// Gauge level that raises an alert
    threshold: u8,
    /// Active alerts, newest first
    alerts: Vec<Alert>,
    /// Needs represented among `alerts`
    active_needs: HashSet<Need>,
    next_id: u64,
}

impl AlertEngine {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            alerts: Vec::new(),
            active_needs: HashSet::new(),
            next_id: 1,
        }
    }

    /// Raise alerts for every growable need at or above the threshold that
    /// has no active alert yet. Returns the created alerts.
    pub fn evaluate_gauges(&mut self, gauges: &NeedGauges) -> Vec<Alert> {
        let triggers = {
            let ctx = TriggerContext {
                gauges,
                threshold: self.threshold,
                active_needs: &self.active_needs,
            };
            evaluate_thresholds(&ctx)
        };
        triggers
            .into_iter()
            .filter_map(|trigger| self.raise(trigger))
            .collect()
    }

    /// Pass an Emergency signal straight through to an alert.
    pub fn observe_signal(&mut self, event: &SignalEvent) -> Option<Alert> {
        match evaluate_signal(event, &self.active_needs) {
            Some(trigger) => self.raise(trigger),
            None => {
                if event.need == Need::Emergency {
                    log::debug!("Emergency alert already active, ignoring repeat signal");
                }
                None
            }
        }
    }

    fn raise(&mut self, trigger: AlertTrigger) -> Option<Alert> {
        let need = trigger.need();
        if need == Need::Calm || !self.active_needs.insert(need) {
            log::debug!("Suppressed duplicate alert for {}", need);
            return None;
        }

        let alert = Alert {
            id: AlertId(self.next_id),
            need,
            message: trigger.message().to_string(),
            timestamp: Utc::now(),
            urgency: need.urgency(),
        };
        self.next_id += 1;

        log::info!("Alert {} raised for {}: {}", alert.id, need, alert.message);
        self.alerts.insert(0, alert.clone());
        Some(alert)
    }

    /// Remove an alert by id. Returns the removed alert.
    pub fn dismiss(&mut self, id: AlertId) -> Option<Alert> {
        let index = self.alerts.iter().position(|a| a.id == id)?;
        let alert = self.alerts.remove(index);
        self.active_needs.remove(&alert.need);
        log::info!("Alert {} for {} dismissed", alert.id, alert.need);
        Some(alert)
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn is_active(&self, need: Need) -> bool {
        self.active_needs.contains(&need)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_raises_threshold_alert_once() {
        let mut engine = AlertEngine::default();
        let gauges = NeedGauges { food: 80, water: 0, restroom: 0 };

        let created = engine.evaluate_gauges(&gauges);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].need, Need::Food);

        // Level stays above threshold on later ticks
        let gauges = NeedGauges { food: 95, water: 0, restroom: 0 };
        assert!(engine.evaluate_gauges(&gauges).is_empty());
        assert_eq!(engine.alerts().len(), 1);
    }

    #[test]
    fn test_engine_orders_newest_first() {
        let mut engine = AlertEngine::default();
        let first = engine
            .evaluate_gauges(&NeedGauges { food: 0, water: 85, restroom: 0 })
            .remove(0);
        let second = engine
            .observe_signal(&SignalEvent::for_need(Need::Emergency))
            .unwrap();

        assert!(second.id > first.id);
        let ids: Vec<AlertId> = engine.alerts().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_engine_repeat_emergency_ignored() {
        let mut engine = AlertEngine::default();
        let emergency = SignalEvent::for_need(Need::Emergency);
        assert!(engine.observe_signal(&emergency).is_some());
        assert!(engine.observe_signal(&emergency).is_none());
        assert_eq!(engine.alerts().len(), 1);
        assert!(engine.is_active(Need::Emergency));
    }

    #[test]
    fn test_engine_dismiss_reopens_need() {
        let mut engine = AlertEngine::default();
        let emergency = SignalEvent::for_need(Need::Emergency);
        let alert = engine.observe_signal(&emergency).unwrap();

        let removed = engine.dismiss(alert.id).unwrap();
        assert_eq!(removed.id, alert.id);
        assert!(engine.alerts().is_empty());
        assert!(!engine.is_active(Need::Emergency));

        let again = engine.observe_signal(&emergency).unwrap();
        assert_ne!(again.id, alert.id);
    }

    #[test]
    fn test_engine_dismiss_unknown_id() {
        let mut engine = AlertEngine::default();
        engine.evaluate_gauges(&NeedGauges { food: 100, water: 100, restroom: 100 });
        assert!(engine.dismiss(AlertId(999)).is_none());
        assert_eq!(engine.alerts().len(), 3);
    }

    #[test]
    fn test_engine_alert_fields_follow_need() {
        let mut engine = AlertEngine::new(50);
        let created = engine.evaluate_gauges(&NeedGauges { food: 0, water: 0, restroom: 50 });
        assert_eq!(created.len(), 1);
        let alert = &created[0];
        assert_eq!(alert.urgency, crate::core::model::Urgency::Medium);
        assert_eq!(alert.message, "Patient may need restroom. Restroom need level is high.");
        assert_eq!(engine.get(alert.id), Some(alert));
    }
}
