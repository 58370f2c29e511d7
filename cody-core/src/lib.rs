//! cody-core: session lifecycle for the cody mock-interview client.
//!
//! Everything in this crate is UI-agnostic. The terminal front end in the `cody`
//! binary owns a [`session::SessionController`] and a [`runtime::Runtime`], feeds
//! user input in as [`session::Action`]s, and renders whatever the controller's
//! [`session::Session`] says.
//!
//! Leaf modules (`language`, `detector`, `related`, `timer`) are pure and have no
//! I/O. Network access is confined to `client`; scheduling to `runtime`.

pub mod client;
pub mod detector;
pub mod language;
pub mod related;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod types;

pub use client::{HttpInterviewService, InterviewService, ServiceError};
pub use language::Language;
pub use runtime::Runtime;
pub use session::{Action, Effect, Session, SessionContext, SessionController, TransitionError};
pub use types::{Message, Problem, RelatedProblem, Role, Screen};
