use std::collections::BTreeMap;

use serde::Serialize;

use super::alerts::engine::AlertEngine;
use super::alerts::model::{Alert, AlertId};
use super::config::Settings;
use super::gauges::NeedGauges;
use super::model::{Need, PatientStatus, SignalEvent};
use super::status::derive_status;
use super::suggestions::board::{Applied, SuggestionBoard};
use super::suggestions::fetcher::SuggestionError;

pub const INITIAL_MESSAGE: &str = "System initializing...";

/// Read-only view handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    /// Newest first
    pub alerts: Vec<Alert>,
    pub status: PatientStatus,
    pub last_message: String,
    pub comfort_score: f64,
    pub gauges: NeedGauges,
    pub suggestions: BTreeMap<AlertId, Vec<String>>,
    pub in_flight: Option<AlertId>,
}

/// All mutable monitor state. Every transition is a method call here.
pub struct MonitorState {
    gauges: NeedGauges,
    engine: AlertEngine,
    suggestions: SuggestionBoard,
    last_message: String,
    passive_increment: u8,
    signal_boost: u8,
}

impl MonitorState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            gauges: NeedGauges::new(),
            engine: AlertEngine::new(settings.alert_threshold),
            suggestions: SuggestionBoard::new(),
            last_message: INITIAL_MESSAGE.to_string(),
            passive_increment: settings.passive_increment,
            signal_boost: settings.signal_boost,
        }
    }

    /// Apply one generated signal. Emergencies alert directly, growable needs
    /// boost their gauge. Returns the alerts created.
    pub fn on_signal(&mut self, event: &SignalEvent) -> Vec<Alert> {
        self.last_message = event.message.clone();

        if event.need == Need::Emergency {
            return self.engine.observe_signal(event).into_iter().collect();
        }
        if self.gauges.boost(event.need, self.signal_boost) {
            return self.engine.evaluate_gauges(&self.gauges);
        }
        Vec::new()
    }

    /// Passive growth of every gauge.
    pub fn passive_tick(&mut self) -> Vec<Alert> {
        self.gauges.passive_tick(self.passive_increment);
        self.engine.evaluate_gauges(&self.gauges)
    }

    /// Caretaker dismissal: remove the alert, zero its gauge, drop its suggestions.
    pub fn dismiss(&mut self, id: AlertId) -> Option<Alert> {
        let alert = self.engine.dismiss(id)?;
        self.gauges.reset(alert.need);
        self.suggestions.purge(id);
        Some(alert)
    }

    /// Start a suggestion fetch for an active alert. Returns the need to look
    /// up, or `None` if the alert is gone or another fetch is in flight.
    pub fn begin_suggestions(&mut self, id: AlertId) -> Option<Need> {
        let need = self.engine.get(id)?.need;
        if self.suggestions.begin(id) {
            Some(need)
        } else {
            None
        }
    }

    /// Apply a finished fetch against the current alert set.
    pub fn apply_suggestions(
        &mut self,
        id: AlertId,
        result: Result<Vec<String>, SuggestionError>,
    ) -> Applied {
        let active = self.engine.get(id).is_some();
        self.suggestions.complete(id, result, active)
    }

    pub fn alerts(&self) -> &[Alert] {
        self.engine.alerts()
    }

    pub fn status(&self) -> PatientStatus {
        derive_status(self.engine.alerts())
    }

    pub fn gauges(&self) -> &NeedGauges {
        &self.gauges
    }

    pub fn comfort_score(&self) -> f64 {
        self.gauges.comfort_score()
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn suggestions(&self) -> &SuggestionBoard {
        &self.suggestions
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            alerts: self.engine.alerts().to_vec(),
            status: self.status(),
            last_message: self.last_message.clone(),
            comfort_score: self.comfort_score(),
            gauges: self.gauges,
            suggestions: self.suggestions.entries().clone(),
            in_flight: self.suggestions.in_flight(),
        }
    }
}
