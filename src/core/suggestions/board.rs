//! Per-alert suggestion storage.
//!
//! Only one fetch may be in flight across the whole monitor. Results are
//! applied by alert id against whatever alerts exist when they arrive.

use std::collections::BTreeMap;

use super::fetcher::SuggestionError;
use crate::core::alerts::model::AlertId;

/// Shown in place of suggestions when the lookup fails.
pub const FALLBACK_SUGGESTION: &str = "Sorry, couldn't get suggestions at this time.";

/// What happened to a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    /// Lookup failed; the fallback list was stored instead.
    Fallback,
    /// The alert was dismissed while the fetch was running.
    Discarded,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionBoard {
    entries: BTreeMap<AlertId, Vec<String>>,
    in_flight: Option<AlertId>,
}

impl SuggestionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch as in flight for `id`. Returns false (and changes nothing)
    /// while another fetch is still running.
    pub fn begin(&mut self, id: AlertId) -> bool {
        match self.in_flight {
            Some(current) => {
                log::debug!(
                    "Suggestion fetch for alert {} still running, ignoring request for {}",
                    current,
                    id
                );
                false
            }
            None => {
                self.in_flight = Some(id);
                true
            }
        }
    }

    /// Apply a finished fetch. The in-flight marker is always cleared for `id`.
    /// Results for alerts that are gone are dropped.
    pub fn complete(
        &mut self,
        id: AlertId,
        result: Result<Vec<String>, SuggestionError>,
        alert_active: bool,
    ) -> Applied {
        if self.in_flight == Some(id) {
            self.in_flight = None;
        }

        if !alert_active {
            log::debug!("Discarding suggestions for dismissed alert {}", id);
            return Applied::Discarded;
        }

        match result {
            Ok(suggestions) if !suggestions.is_empty() => {
                self.entries.insert(id, suggestions);
                Applied::Stored
            }
            Ok(_) => {
                log::warn!("Suggestion fetch for alert {} returned nothing", id);
                self.entries.insert(id, vec![FALLBACK_SUGGESTION.to_string()]);
                Applied::Fallback
            }
            Err(e) => {
                log::warn!("Error fetching suggestions for alert {}: {}", id, e);
                self.entries.insert(id, vec![FALLBACK_SUGGESTION.to_string()]);
                Applied::Fallback
            }
        }
    }

    /// Drop stored suggestions for a dismissed alert. A running fetch keeps its
    /// in-flight marker until it resolves.
    pub fn purge(&mut self, id: AlertId) -> Option<Vec<String>> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: AlertId) -> Option<&[String]> {
        self.entries.get(&id).map(Vec::as_slice)
    }

    pub fn in_flight(&self) -> Option<AlertId> {
        self.in_flight
    }

    pub fn entries(&self) -> &BTreeMap<AlertId, Vec<String>> {
        &self.entries
    }
}
