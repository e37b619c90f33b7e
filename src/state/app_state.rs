//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::timer_state::{Tick, TimerState};
use crate::{
    auth::{authenticate, AuthenticatedEmail},
    error::QuizError,
    presentation::{PresentationSink, Screen, ScreenSink},
    quiz::QuizSource,
    session::{AnswerOutcome, Phase, QuizSession, SessionState},
};

/// Everything guarded by the single state lock
#[derive(Debug, Default)]
pub struct QuizRuntime {
    pub session: QuizSession,
    pub screen: ScreenSink,
    pub student: Option<AuthenticatedEmail>,
}

/// Point-in-time copy of the session for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub student: Option<String>,
    pub state: SessionState,
    pub screen: Screen,
}

/// Main application state: the quiz runtime plus server metadata
pub struct AppState {
    runtime: Mutex<QuizRuntime>,
    /// Where the quiz definition is fetched from on login
    source: Arc<dyn QuizSource>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for countdown updates, consumed by the round timer task
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    pub fn new(port: u16, host: String, source: Arc<dyn QuizSource>) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::new());

        Self {
            runtime: Mutex::new(QuizRuntime::default()),
            source,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Lock the runtime, apply `updater`, then publish the countdown
    pub fn update_runtime<F, R>(&self, updater: F) -> Result<R, QuizError>
    where
        F: FnOnce(&mut QuizRuntime) -> R,
    {
        let mut runtime = self.runtime.lock()
            .map_err(|e| QuizError::Lock(e.to_string()))?;

        let result = updater(&mut *runtime);
        let timer = runtime.session.timer().clone();
        drop(runtime); // Release the lock early

        self.timer_update_tx.send_if_modified(|current| {
            if *current == timer {
                false
            } else {
                *current = timer;
                true
            }
        });

        Ok(result)
    }

    /// Lock the runtime and read from it
    pub fn with_runtime<F, R>(&self, reader: F) -> Result<R, QuizError>
    where
        F: FnOnce(&QuizRuntime) -> R,
    {
        let runtime = self.runtime.lock()
            .map_err(|e| QuizError::Lock(e.to_string()))?;
        Ok(reader(&runtime))
    }

    /// Handle the login form: check the address, then load and start the quiz.
    ///
    /// A rejected address or failed load leaves the session idle, so the
    /// user can simply try again.
    pub async fn login(&self, email: &str) -> Result<Screen, QuizError> {
        self.record_action("login");

        let student = match authenticate(email) {
            Ok(student) => student,
            Err(e) => {
                warn!("Rejected login for {:?}", email.trim());
                let message = e.to_string();
                self.update_runtime(|runtime| {
                    if runtime.session.phase() == Phase::Idle {
                        runtime.screen.show_login_error(&message);
                    }
                })?;
                return Err(e.into());
            }
        };

        if self.phase()? != Phase::Idle {
            info!("{} logged in while a quiz is already running", student.as_str());
            return self.screen();
        }

        info!("{} logged in, loading quiz from {}", student.as_str(), self.source.describe());
        let loaded = self.source.load().await;

        self.update_runtime(|runtime| -> Result<Screen, QuizError> {
            if runtime.session.phase() != Phase::Idle {
                return Ok(runtime.screen.screen().clone());
            }

            match loaded {
                Ok(definition) => {
                    runtime.session.load(definition, &mut runtime.screen)?;
                    runtime.student = Some(student);
                    Ok(runtime.screen.screen().clone())
                }
                Err(e) => {
                    error!("Error loading quiz data: {}", e);
                    runtime.screen.show_load_error(&e.to_string());
                    Err(e.into())
                }
            }
        })?
    }

    /// Handle the advance button with the selected choice, if any
    pub fn submit_answer(&self, choice: Option<&str>) -> Result<(AnswerOutcome, Screen), QuizError> {
        self.record_action("next");

        let outcome = self.update_runtime(|runtime| {
            runtime.session.submit_answer(choice, &mut runtime.screen)
        })??;

        Ok((outcome, self.screen()?))
    }

    /// Deliver one countdown tick
    pub fn tick(&self, generation: u64) -> Result<Tick, QuizError> {
        self.update_runtime(|runtime| runtime.session.tick(generation, &mut runtime.screen))
    }

    /// Verify the definition source is usable without starting anything
    pub async fn preflight(&self) -> Result<(), QuizError> {
        let definition = self.source.load().await?;
        info!(
            "Quiz definition from {} is usable: {} rounds",
            self.source.describe(),
            definition.round_count()
        );
        Ok(())
    }

    pub fn phase(&self) -> Result<Phase, QuizError> {
        self.with_runtime(|runtime| runtime.session.phase())
    }

    /// Get the screen currently shown to the user
    pub fn screen(&self) -> Result<Screen, QuizError> {
        self.with_runtime(|runtime| runtime.screen.screen().clone())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, QuizError> {
        self.with_runtime(|runtime| SessionSnapshot {
            phase: runtime.session.phase(),
            student: runtime.student.as_ref().map(|s| s.as_str().to_string()),
            state: runtime.session.state().clone(),
            screen: runtime.screen.screen().clone(),
        })
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
