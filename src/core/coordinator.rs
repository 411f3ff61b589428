use super::alerts::model::{Alert, AlertId};
use super::config::Settings;
use super::model::{Need, SignalEvent};
use super::state::{MonitorSnapshot, MonitorState};
use super::suggestions::board::Applied;
use super::suggestions::fetcher::SuggestionError;

/// Everything that can change monitor state, applied one at a time.
#[derive(Debug)]
pub enum MonitorInput {
    Signal(SignalEvent),
    PassiveTick,
    Dismiss(AlertId),
    RequestSuggestions(AlertId),
    SuggestionsReady {
        alert_id: AlertId,
        result: Result<Vec<String>, SuggestionError>,
    },
}

/// A lookup the runtime has to start on the coordinator's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub alert_id: AlertId,
    pub need: Need,
}

#[derive(Debug, Default)]
pub struct CoordinatorOutput {
    pub created: Vec<Alert>,
    pub dismissed: Option<Alert>,
    pub fetch: Option<FetchRequest>,
    pub applied: Option<Applied>,
}

pub struct Coordinator {
    state: MonitorState,
}

impl Coordinator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: MonitorState::new(settings),
        }
    }

    pub fn handle(&mut self, input: MonitorInput) -> CoordinatorOutput {
        let mut output = CoordinatorOutput::default();

        match input {
            MonitorInput::Signal(event) => {
                output.created = self.state.on_signal(&event);
            }
            MonitorInput::PassiveTick => {
                output.created = self.state.passive_tick();
            }
            MonitorInput::Dismiss(alert_id) => {
                output.dismissed = self.state.dismiss(alert_id);
                if output.dismissed.is_none() {
                    log::debug!("Dismiss for unknown alert {}", alert_id);
                }
            }
            MonitorInput::RequestSuggestions(alert_id) => {
                output.fetch = self
                    .state
                    .begin_suggestions(alert_id)
                    .map(|need| FetchRequest { alert_id, need });
                if let Some(request) = &output.fetch {
                    log::debug!("Fetching suggestions for alert {} ({})", alert_id, request.need);
                }
            }
            MonitorInput::SuggestionsReady { alert_id, result } => {
                output.applied = Some(self.state.apply_suggestions(alert_id, result));
            }
        }

        output
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.state.snapshot()
    }
}
