//! Suggestion lookup boundary.
//!
//! The real system asks a language model for caregiver advice. Here the text is
//! canned, but it still goes through the same response parsing.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use thiserror::Error;

use crate::core::model::Need;

pub const EMPTY_RESPONSE_SUGGESTION: &str = "No suggestions available at this time.";
pub const UNPARSEABLE_RESPONSE_SUGGESTION: &str = "Could not parse suggestions from the response.";

lazy_static! {
    // Leading list numbering such as "1. " or "12.  "
    static ref NUMBERING: Regex = Regex::new(r"^\d+\.\s*").expect("Invalid numbering regex");
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("suggestion fetch failed: {0}")]
    FetchFailed(String),
    #[error("suggestion fetch timed out after {0:?}")]
    TimedOut(Duration),
}

/// Asynchronous source of caregiver suggestions for a need.
#[async_trait]
pub trait SuggestionFetcher: Send + Sync {
    /// Returns one or more short suggestions, in display order.
    async fn fetch(&self, need: Need) -> Result<Vec<String>, SuggestionError>;
}

/// Run a fetch bounded by `timeout`. A timeout counts as a failure.
pub async fn fetch_with_timeout(
    fetcher: &dyn SuggestionFetcher,
    need: Need,
    timeout: Duration,
) -> Result<Vec<String>, SuggestionError> {
    match tokio::time::timeout(timeout, fetcher.fetch(need)).await {
        Ok(result) => result,
        Err(_) => Err(SuggestionError::TimedOut(timeout)),
    }
}

/// Split a numbered-list response into clean suggestion lines.
pub fn parse_suggestion_text(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![EMPTY_RESPONSE_SUGGESTION.to_string()];
    }

    let suggestions: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| NUMBERING.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if suggestions.is_empty() {
        vec![UNPARSEABLE_RESPONSE_SUGGESTION.to_string()]
    } else {
        suggestions
    }
}

fn canned_response(need: Need) -> &'static str {
    match need {
        Need::Food => {
            "1. Offer a small, easy-to-eat snack they usually enjoy.\n\
             2. Check whether it is close to a regular mealtime.\n\
             3. Ask yes/no questions to narrow down what they would like.\n\
             4. Make sure they are seated upright before eating."
        }
        Need::Water => {
            "1. Offer a glass of water with a straw.\n\
             2. Check if their mouth appears dry.\n\
             3. Ask simple yes/no questions they can answer, like \"Are you thirsty?\".\n\
             4. Ensure water is within their easy reach if they have mobility."
        }
        Need::Restroom => {
            "1. Calmly let them know you are coming to help.\n\
             2. Prepare the mobility aid or commode they normally use.\n\
             3. Keep the path to the restroom clear and well lit.\n\
             4. Respect their privacy once they are safely settled."
        }
        Need::Emergency => {
            "1. Go to the patient immediately and check responsiveness.\n\
             2. Check breathing and look for signs of distress or injury.\n\
             3. Call emergency services if anything looks wrong.\n\
             4. Stay with the patient and keep them calm until help arrives."
        }
        Need::Calm => {
            "1. No action needed right now.\n\
             2. Keep checking in at regular intervals."
        }
    }
}

/// Mocked fetcher returning canned advice after a simulated latency.
pub struct CannedSuggestionFetcher {
    latency: Duration,
    failure_rate: f64,
}

impl CannedSuggestionFetcher {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for CannedSuggestionFetcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(1_200), 0.0)
    }
}

#[async_trait]
impl SuggestionFetcher for CannedSuggestionFetcher {
    async fn fetch(&self, need: Need) -> Result<Vec<String>, SuggestionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failed = rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            return Err(SuggestionError::FetchFailed(
                "simulated upstream failure".to_string(),
            ));
        }

        Ok(parse_suggestion_text(canned_response(need)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverFetcher;

    #[async_trait]
    impl SuggestionFetcher for NeverFetcher {
        async fn fetch(&self, _need: Need) -> Result<Vec<String>, SuggestionError> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_parse_strips_numbering_and_blank_lines() {
        let text = "1. Offer water.\n\n  2.   Check lips.  \n3.Ask a question.\n";
        assert_eq!(
            parse_suggestion_text(text),
            vec!["Offer water.", "Check lips.", "Ask a question."]
        );
    }

    #[test]
    fn test_parse_keeps_unnumbered_lines() {
        assert_eq!(parse_suggestion_text("Just stay nearby."), vec!["Just stay nearby."]);
    }

    #[test]
    fn test_parse_empty_and_unparseable() {
        assert_eq!(parse_suggestion_text("   \n"), vec![EMPTY_RESPONSE_SUGGESTION]);
        assert_eq!(parse_suggestion_text("1.\n2. "), vec![UNPARSEABLE_RESPONSE_SUGGESTION]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_canned_fetcher_returns_list() {
        let fetcher = CannedSuggestionFetcher::default();
        let suggestions = fetcher.fetch(Need::Water).await.unwrap();
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0], "Offer a glass of water with a straw.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_canned_fetcher_always_failing() {
        let fetcher = CannedSuggestionFetcher::new(Duration::ZERO, 1.0);
        let err = fetcher.fetch(Need::Food).await.unwrap_err();
        assert!(matches!(err, SuggestionError::FetchFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_is_failure() {
        let result = fetch_with_timeout(&NeverFetcher, Need::Food, Duration::from_secs(3)).await;
        assert_eq!(result, Err(SuggestionError::TimedOut(Duration::from_secs(3))));
    }
}
