use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    config::WizardConfig,
    preferences::{AlcoholPreference, DietType, PreferenceRecord},
    recommendation::DishRecommendation,
};

/// Ways a recommendation call can fail. All of them leave the session on the error step.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderError {
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),
}

/// Source of dish recommendations for a completed preference record.
///
/// The controller never has more than one call in flight per session.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(
        &self,
        preferences: &PreferenceRecord,
    ) -> Result<Vec<DishRecommendation>, ProviderError>;
}

const MOCK_IMAGE: &str = "/placeholder.svg?height=200&width=300";

/// Stand-in for the recommendation model.
///
/// Waits `latency`, then derives three dishes from the diet type and the alcohol
/// preference only. Food category and mood are accepted but do not change the output.
pub struct MockProvider {
    latency: Duration,
    failures_left: AtomicU32,
    calls: AtomicUsize,
    requests: Mutex<Vec<PreferenceRecord>>,
}

impl MockProvider {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

    pub fn new() -> Self {
        Self::with_latency(Self::DEFAULT_LATENCY)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            failures_left: AtomicU32::new(0),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Mock that waits the `provider_latency` configured for the session.
    pub fn from_config(config: &WizardConfig) -> Self {
        Self::with_latency(config.provider_latency)
    }

    /// Reject the next `count` calls after the usual latency.
    pub fn failing_first(self, count: u32) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Number of calls started so far, including rejected and cancelled ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Preference records received, in call order.
    pub async fn requests(&self) -> Vec<PreferenceRecord> {
        self.requests.lock().await.clone()
    }

    /// The fixed mock output for `preferences`.
    pub fn dishes_for(preferences: &PreferenceRecord) -> Vec<DishRecommendation> {
        let vegetarian = preferences.diet_type == Some(DietType::Vegetarian);
        let wants_alcohol = preferences.alcohol == Some(AlcoholPreference::Yes);

        vec![
            DishRecommendation::new(
                if vegetarian { "Mushroom Risotto" } else { "Grilled Salmon" },
                "A delicious dish perfect for your mood.",
                4.8,
            )
            .with_image(MOCK_IMAGE),
            DishRecommendation::new(
                if vegetarian {
                    "Vegetable Pad Thai"
                } else {
                    "Chicken Tikka Masala"
                },
                "Flavorful and satisfying option.",
                4.6,
            )
            .with_image(MOCK_IMAGE),
            DishRecommendation::new(
                if wants_alcohol {
                    "Wine-Paired Pasta"
                } else {
                    "Fresh Garden Salad"
                },
                "Perfectly balanced flavors.",
                4.7,
            )
            .with_image(MOCK_IMAGE),
        ]
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecommendationProvider for MockProvider {
    async fn recommend(
        &self,
        preferences: &PreferenceRecord,
    ) -> Result<Vec<DishRecommendation>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().await.push(preferences.clone());
        debug!(call, latency_ms = self.latency.as_millis() as u64, "Mock provider called");

        tokio::time::sleep(self.latency).await;

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            warn!(call, "Mock provider rejecting request");
            return Err(ProviderError::Rejected(format!(
                "mock failure on call {call}"
            )));
        }

        Ok(Self::dishes_for(preferences))
    }
}
