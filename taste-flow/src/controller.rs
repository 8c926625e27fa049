//! WizardController – async driver that owns one session and performs the effects the
//! [`Wizard`] state machine asks for.
//!
//! Each session runs on its own tokio task. The task owns all session state and waits
//! on three things at once:
//!
//! * commands from [`WizardHandle`]s (user actions, snapshot requests, shutdown),
//! * the splash timer, when armed,
//! * the in-flight provider call, when there is one.
//!
//! The timer and the provider call live inside the task as plain futures. Cancelling
//! them means dropping them, so once a reset or a shutdown has been handled nothing from
//! the old timer or call can reach the state machine.
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use taste_flow::{MockProvider, Selection, DietType, WizardConfig, WizardController};
//! # async fn demo() -> taste_flow::Result<()> {
//! let handle = WizardController::spawn(Arc::new(MockProvider::new()), WizardConfig::default());
//! handle.wait_for_step(taste_flow::Step::DietType).await?;
//! handle.select(Selection::DietType(DietType::Vegetarian)).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Sleep;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    config::WizardConfig,
    error::{FlowError, Result},
    preferences::{PreferenceRecord, Selection},
    provider::{ProviderError, RecommendationProvider},
    recommendation::DishRecommendation,
    step::Step,
    wizard::{Effect, Input, Transition, UserAction, Wizard, WizardSnapshot},
};

type ProviderOutcome = std::result::Result<Vec<DishRecommendation>, ProviderError>;
type PendingCall = Pin<Box<dyn Future<Output = ProviderOutcome> + Send>>;

enum Command {
    Dispatch {
        action: UserAction,
        reply: oneshot::Sender<Result<WizardSnapshot>>,
    },
    Snapshot {
        reply: oneshot::Sender<WizardSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Owner of one session's state. Created through [`WizardController::spawn`].
pub struct WizardController {
    session_id: String,
    wizard: Wizard,
    provider: Arc<dyn RecommendationProvider>,
    config: WizardConfig,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<WizardSnapshot>,
    splash: Option<Pin<Box<Sleep>>>,
    pending: Option<PendingCall>,
}

impl WizardController {
    /// Start a new session with a random id and return a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(provider: Arc<dyn RecommendationProvider>, config: WizardConfig) -> WizardHandle {
        Self::spawn_with_id(Uuid::new_v4().to_string(), provider, config)
    }

    pub fn spawn_with_id(
        session_id: impl Into<String>,
        provider: Arc<dyn RecommendationProvider>,
        config: WizardConfig,
    ) -> WizardHandle {
        let session_id = session_id.into();
        let wizard = Wizard::new();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(wizard.snapshot());

        let controller = Self {
            session_id: session_id.clone(),
            wizard,
            provider,
            config,
            commands: commands_rx,
            state: state_tx,
            splash: None,
            pending: None,
        };
        let span = info_span!("wizard_session", session_id = %session_id);
        tokio::spawn(controller.run().instrument(span));

        WizardHandle {
            session_id,
            commands: commands_tx,
            state: state_rx,
        }
    }

    async fn run(mut self) {
        info!("Session started");
        let start = self.wizard.start();
        self.perform(start.effects);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Dispatch { action, reply }) => {
                        let result = self
                            .handle(Input::User(action))
                            .map(|_| self.wizard.snapshot());
                        let _ = reply.send(result);
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.wizard.snapshot());
                    }
                    Some(Command::Shutdown { reply }) => {
                        self.teardown();
                        let _ = reply.send(());
                        return;
                    }
                    None => break,
                },
                () = next_tick(&mut self.splash) => {
                    self.splash = None;
                    let _ = self.handle(Input::SplashElapsed);
                }
                outcome = next_outcome(&mut self.pending) => {
                    self.pending = None;
                    let input = match outcome {
                        Ok(dishes) => Input::RecommendationsReady(dishes),
                        Err(e) => Input::RecommendationsFailed(e),
                    };
                    let _ = self.handle(input);
                }
            }
        }

        self.teardown();
    }

    fn handle(&mut self, input: Input) -> Result<Transition> {
        let step = self.wizard.step();
        let transition = self.wizard.apply(input).inspect_err(|e| {
            warn!(step = %step, error = %e, "Rejected wizard input");
        })?;

        if let Some(message) = &transition.status_message {
            info!(from = %transition.from, to = %transition.to, "{}", message);
        } else {
            info!(from = %transition.from, to = %transition.to, "Step changed");
        }

        self.perform(transition.effects.clone());
        self.publish();
        Ok(transition)
    }

    fn perform(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CancelPending => self.cancel_pending(),
                Effect::ArmSplashTimer => {
                    debug!(
                        delay_ms = self.config.splash_delay.as_millis() as u64,
                        "Arming splash timer"
                    );
                    self.splash = Some(Box::pin(tokio::time::sleep(self.config.splash_delay)));
                }
                Effect::Submit(preferences) => self.submit(preferences),
            }
        }
    }

    fn submit(&mut self, preferences: PreferenceRecord) {
        if self.pending.is_some() {
            // Unreachable through the state machine; never let two calls race.
            warn!("Dropping unexpected in-flight provider call before resubmitting");
            self.pending = None;
        }

        let provider = Arc::clone(&self.provider);
        let timeout = self.config.provider_timeout;
        info!(
            attempt = self.wizard.attempts(),
            diet_type = ?preferences.diet_type,
            food_category = ?preferences.food_category,
            mood = ?preferences.mood,
            alcohol = ?preferences.alcohol,
            "Requesting recommendations"
        );

        let call: PendingCall = Box::pin(async move {
            match tokio::time::timeout(timeout, provider.recommend(&preferences)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderError::Timeout(timeout)),
            }
        });
        self.pending = Some(call);
    }

    fn cancel_pending(&mut self) {
        if self.splash.take().is_some() {
            debug!("Cancelled splash timer");
        }
        if self.pending.take().is_some() {
            info!("Cancelled in-flight provider call");
        }
    }

    fn publish(&self) {
        let snapshot = self.wizard.snapshot();
        self.state.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn teardown(&mut self) {
        self.cancel_pending();
        info!(session_id = %self.session_id, step = %self.wizard.step(), "Session closed");
    }
}

async fn next_tick(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer.as_mut() {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn next_outcome(call: &mut Option<PendingCall>) -> ProviderOutcome {
    match call.as_mut() {
        Some(call) => call.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Cloneable handle to a running session.
///
/// The session shuts down after [`WizardHandle::shutdown`] or once every handle is dropped.
#[derive(Clone)]
pub struct WizardHandle {
    session_id: String,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<WizardSnapshot>,
}

impl WizardHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Apply a user action and return the state right after it.
    pub async fn dispatch(&self, action: UserAction) -> Result<WizardSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { action, reply })
            .map_err(|_| FlowError::SessionClosed)?;
        rx.await.map_err(|_| FlowError::SessionClosed)?
    }

    pub async fn select(&self, selection: Selection) -> Result<WizardSnapshot> {
        self.dispatch(UserAction::Select(selection)).await
    }

    pub async fn start_over(&self) -> Result<WizardSnapshot> {
        self.dispatch(UserAction::StartOver).await
    }

    pub async fn retry(&self) -> Result<WizardSnapshot> {
        self.dispatch(UserAction::Retry).await
    }

    /// State as seen by the session task once every earlier command has been handled.
    pub async fn snapshot(&self) -> Result<WizardSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .map_err(|_| FlowError::SessionClosed)?;
        rx.await.map_err(|_| FlowError::SessionClosed)
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.state.clone()
    }

    /// Resolve once the session reaches `step`.
    pub async fn wait_for_step(&self, step: Step) -> Result<WizardSnapshot> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|s| s.step == step)
            .await
            .map_err(|_| FlowError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    /// Cancel anything pending and stop the session task.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { reply })
            .map_err(|_| FlowError::SessionClosed)?;
        rx.await.map_err(|_| FlowError::SessionClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
