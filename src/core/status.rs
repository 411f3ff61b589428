use super::alerts::model::Alert;
use super::model::PatientStatus;

/// Reduce the active alert set to a coarse patient status.
/// Emergency outranks everything; any other alert means NeedsAttention.
pub fn derive_status(alerts: &[Alert]) -> PatientStatus {
    if alerts.is_empty() {
        PatientStatus::Calm
    } else if alerts.iter().any(Alert::is_emergency) {
        PatientStatus::Emergency
    } else {
        PatientStatus::NeedsAttention
    }
}
