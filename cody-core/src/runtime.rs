//! Effect executor.
//!
//! Runs the effects produced by [`crate::session::transition`] against an
//! [`InterviewService`] and the tokio clock. Every result is fed back into the
//! session as an [`Action`] over the channel handed to [`Runtime::new`]; the
//! runtime itself never touches session state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::InterviewService;
use crate::session::{Action, Effect, RESET_NOTICE};
use crate::timer::TICK_INTERVAL;

pub struct Runtime<S: InterviewService + 'static> {
    service: Arc<S>,
    tx: UnboundedSender<Action>,
    countdown: Option<JoinHandle<()>>,
}

impl<S: InterviewService + 'static> Runtime<S> {
    pub fn new(service: Arc<S>, tx: UnboundedSender<Action>) -> Self {
        Self {
            service,
            tx,
            countdown: None,
        }
    }

    /// True while a countdown task is alive.
    pub fn is_counting_down(&self) -> bool {
        matches!(&self.countdown, Some(handle) if !handle.is_finished())
    }

    /// Executes one transition's effects and returns any user-facing warnings.
    ///
    /// Timer effects take effect immediately. Network effects are started on a
    /// single background task and run in the order given, so a language update
    /// reaches the service before the turn that depends on it.
    pub fn execute(&mut self, effects: Vec<Effect>) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut network = Vec::new();

        for effect in effects {
            match effect {
                Effect::StartCountdown {
                    generation,
                    seconds,
                } => {
                    self.start_countdown(generation, seconds);
                }
                Effect::StopCountdown => self.stop_countdown(),
                Effect::ScheduleCompletion { delay, epoch } => {
                    self.send_after(delay, Action::AutoComplete { epoch });
                }
                Effect::ScheduleTranscriptClear { delay, epoch } => {
                    self.send_after(delay, Action::DeferredClear { epoch });
                }
                Effect::Warn(message) => warnings.push(message),
                other => network.push(other),
            }
        }

        if !network.is_empty() {
            let service = Arc::clone(&self.service);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                for effect in network {
                    if let Some(action) = run_network_effect(service.as_ref(), effect).await {
                        if tx.send(action).is_err() {
                            break;
                        }
                    }
                }
            });
        }
        warnings
    }

    fn start_countdown(&mut self, generation: u64, seconds: u32) {
        self.stop_countdown();
        let tx = self.tx.clone();
        self.countdown = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately.
            interval.tick().await;
            for _ in 0..seconds {
                interval.tick().await;
                if tx.send(Action::CountdownTick { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, seconds, "countdown started");
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }

    fn send_after(&self, delay: Duration, action: Action) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(action);
        });
    }
}

impl<S: InterviewService + 'static> Drop for Runtime<S> {
    fn drop(&mut self) {
        self.stop_countdown();
    }
}

/// Performs one network effect and maps the outcome to the action the session
/// expects, if any.
async fn run_network_effect<S: InterviewService + ?Sized>(
    service: &S,
    effect: Effect,
) -> Option<Action> {
    match effect {
        Effect::LoadProblem { epoch, text } => {
            tracing::info!(problem = %text, "loading problem");
            let result = service.load_problem(&text).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "problem load failed");
            }
            Some(Action::ProblemLoaded { epoch, result })
        }
        Effect::SetLanguage { language } => {
            if let Err(e) = service.set_language(&language).await {
                tracing::warn!(%language, error = %e, "set-language failed");
            }
            None
        }
        Effect::Ask {
            epoch,
            message,
            language,
            purpose,
        } => {
            let result = service.ask(&message, language.as_deref()).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "ask failed");
            }
            Some(Action::AssistantReplied {
                epoch,
                purpose,
                result,
            })
        }
        Effect::Summarize {
            epoch,
            chat_history,
            problem_title,
        } => {
            tracing::info!(turns = chat_history.len(), "requesting feedback");
            let result = service.summarize(&chat_history, &problem_title).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "summarize failed");
            }
            Some(Action::FeedbackReady { epoch, result })
        }
        Effect::NotifyReset => {
            if let Err(e) = service.ask(RESET_NOTICE, None).await {
                tracing::warn!(error = %e, "reset notice not delivered");
            }
            None
        }
        Effect::StartCountdown { .. }
        | Effect::StopCountdown
        | Effect::ScheduleCompletion { .. }
        | Effect::ScheduleTranscriptClear { .. }
        | Effect::Warn(_) => None,
    }
}
