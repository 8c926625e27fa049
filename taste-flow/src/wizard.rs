//! The wizard state machine.
//!
//! [`Wizard`] holds one session's state and applies one [`Input`] at a time. It never
//! sleeps or calls the provider itself: every transition reports the [`Effect`]s the
//! caller has to carry out (arm the splash timer, submit the record, cancel whatever is
//! pending). [`crate::controller`] is the async driver that performs them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::{
    error::{FlowError, Result},
    preferences::{PreferenceRecord, Selection},
    provider::ProviderError,
    recommendation::DishRecommendation,
    step::Step,
};

/// Something the user can do from a rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserAction {
    Select(Selection),
    StartOver,
    /// Re-submit the same record after a provider failure.
    Retry,
}

/// Everything that can move the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    User(UserAction),
    SplashElapsed,
    RecommendationsReady(Vec<DishRecommendation>),
    RecommendationsFailed(ProviderError),
}

impl From<UserAction> for Input {
    fn from(action: UserAction) -> Self {
        Input::User(action)
    }
}

impl From<Selection> for Input {
    fn from(selection: Selection) -> Self {
        Input::User(UserAction::Select(selection))
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::User(UserAction::Select(selection)) => write!(f, "select {selection}"),
            Input::User(UserAction::StartOver) => f.write_str("start over"),
            Input::User(UserAction::Retry) => f.write_str("retry"),
            Input::SplashElapsed => f.write_str("splash elapsed"),
            Input::RecommendationsReady(dishes) => {
                write!(f, "{} recommendations", dishes.len())
            }
            Input::RecommendationsFailed(e) => write!(f, "provider failure ({e})"),
        }
    }
}

/// Work the driver must perform after a transition, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Drop the splash timer and abort any in-flight provider call.
    CancelPending,
    ArmSplashTimer,
    /// Call the provider with this record.
    Submit(PreferenceRecord),
}

/// Outcome of applying one input.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
    pub effects: Vec<Effect>,
    pub status_message: Option<String>,
}

impl Transition {
    fn new(from: Step, to: Step) -> Self {
        Self {
            from,
            to,
            effects: Vec::new(),
            status_message: None,
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn with_status(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }
}

/// Read-only copy of a session's state, handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: Step,
    pub preferences: PreferenceRecord,
    pub recommendations: Vec<DishRecommendation>,
    pub error: Option<String>,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: Step,
    preferences: PreferenceRecord,
    recommendations: Vec<DishRecommendation>,
    last_error: Option<ProviderError>,
    attempts: u32,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::Splash,
            preferences: PreferenceRecord::new(),
            recommendations: Vec::new(),
            last_error: None,
            attempts: 0,
        }
    }

    /// Effects for a session that has just been created on the splash step.
    pub fn start(&self) -> Transition {
        Transition::new(self.step, self.step).with_effect(Effect::ArmSplashTimer)
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn preferences(&self) -> &PreferenceRecord {
        &self.preferences
    }

    pub fn recommendations(&self) -> &[DishRecommendation] {
        &self.recommendations
    }

    pub fn last_error(&self) -> Option<&ProviderError> {
        self.last_error.as_ref()
    }

    /// Provider calls made for the current record.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            preferences: self.preferences.clone(),
            recommendations: self.recommendations.clone(),
            error: self.last_error.as_ref().map(|e| e.to_string()),
            attempts: self.attempts,
        }
    }

    /// Apply one input. Inputs the current step does not offer are rejected and leave
    /// the state untouched.
    pub fn apply(&mut self, input: Input) -> Result<Transition> {
        let from = self.step;
        let transition = match (from, input) {
            (_, Input::User(UserAction::StartOver)) => {
                self.reset();
                Transition::new(from, Step::Splash)
                    .with_effect(Effect::CancelPending)
                    .with_effect(Effect::ArmSplashTimer)
                    .with_status("Session reset")
            }
            (Step::Splash, Input::SplashElapsed) => {
                self.step = Step::DietType;
                Transition::new(from, self.step)
            }
            (Step::Alcohol, Input::User(UserAction::Select(selection)))
                if selection.step() == Step::Alcohol =>
            {
                self.preferences.record(selection);
                self.submit(from)
                    .with_status(format!("Recorded {selection}, requesting recommendations"))
            }
            (step, Input::User(UserAction::Select(selection))) if selection.step() == step => {
                self.preferences.record(selection);
                // Question steps other than Alcohol always have a following question.
                self.step = step.next().unwrap_or(step);
                Transition::new(from, self.step).with_status(format!("Recorded {selection}"))
            }
            (Step::Loading, Input::RecommendationsReady(dishes)) => {
                let count = dishes.len();
                self.recommendations = dishes;
                self.last_error = None;
                self.step = Step::Results;
                Transition::new(from, self.step)
                    .with_status(format!("Received {count} recommendations"))
            }
            (Step::Loading, Input::RecommendationsFailed(error)) => {
                let message = format!("Recommendation request failed: {error}");
                self.last_error = Some(error);
                self.step = Step::Error;
                Transition::new(from, self.step).with_status(message)
            }
            (Step::Error, Input::User(UserAction::Retry)) => {
                self.submit(from).with_status("Retrying recommendation request")
            }
            (step, input) => return Err(FlowError::invalid(step, &input)),
        };

        debug!(
            from = %transition.from,
            to = %transition.to,
            effects = transition.effects.len(),
            "Applied wizard input"
        );
        Ok(transition)
    }

    fn submit(&mut self, from: Step) -> Transition {
        debug_assert!(self.preferences.is_complete());
        self.step = Step::Loading;
        self.last_error = None;
        self.attempts += 1;
        Transition::new(from, self.step).with_effect(Effect::Submit(self.preferences.clone()))
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}
