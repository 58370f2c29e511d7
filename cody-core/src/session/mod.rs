//! Interview session state machine
//!
//! Follows the Elm architecture:
//! - State is data ([`Session`])
//! - Transitions are pure: `(Session, Action) -> (Session, [Effect])`
//! - Effects are executed by [`crate::runtime::Runtime`], whose results come
//!   back as further actions

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, RESET_NOTICE};
pub use event::{Action, ReplyPurpose};
pub use state::{Session, SessionContext};
pub use transition::{
    greeting_for, transition, TransitionError, TransitionResult, EMPTY_INTERVIEW_WARNING,
    EVALUATION_PLACEHOLDER,
};

/// Owns the live session and applies actions to it one at a time.
///
/// All mutation goes through [`SessionController::dispatch`]; a rejected
/// action leaves the session exactly as it was.
#[derive(Debug, Default)]
pub struct SessionController {
    session: Session,
    context: SessionContext,
}

impl SessionController {
    pub fn new(context: SessionContext) -> Self {
        Self {
            session: Session::default(),
            context,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Applies `action` and returns the effects the runtime should execute.
    ///
    /// # Errors
    ///
    /// Returns the [`TransitionError`] when the action is not allowed in the
    /// current state. The session is unchanged in that case.
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<Effect>, TransitionError> {
        let label = action.label();
        match transition(&self.session, &self.context, action) {
            Ok(result) => {
                tracing::debug!(
                    action = label,
                    epoch = result.session.epoch,
                    effects = result.effects.len(),
                    "transition"
                );
                self.session = result.session;
                Ok(result.effects)
            }
            Err(e) => {
                tracing::info!(action = label, error = %e, "action rejected");
                Err(e)
            }
        }
    }
}
