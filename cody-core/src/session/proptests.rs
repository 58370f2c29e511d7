//! Property-based tests for the session state machine

use super::transition::*;
use super::*;
use crate::client::{ProblemReply, ServiceError, TextReply};
use crate::language::Language;
use crate::types::{Problem, Screen};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![
        Just(Language::JavaScript),
        Just(Language::Python),
        Just(Language::Go),
        Just(Language::Cpp),
    ]
}

fn arb_service_error() -> impl Strategy<Value = ServiceError> {
    prop_oneof![
        "[a-z ]{1,12}".prop_map(ServiceError::Transport),
        "[a-z ]{1,12}".prop_map(ServiceError::Decode),
    ]
}

fn arb_text_reply() -> impl Strategy<Value = Result<TextReply, ServiceError>> {
    prop_oneof![
        "[a-zA-Z ,!]{0,30}".prop_map(|t| Ok::<_, ServiceError>(TextReply::text(t))),
        Just(Ok::<_, ServiceError>(TextReply::text("Thanks for your time, goodbye!"))),
        "[a-z ]{1,12}".prop_map(|e| Ok::<_, ServiceError>(TextReply::error(e))),
        arb_service_error().prop_map(Err),
    ]
}

fn arb_problem_reply() -> impl Strategy<Value = Result<ProblemReply, ServiceError>> {
    let reply = prop_oneof![
        "[A-Z][a-z ]{1,15}".prop_map(|title| ProblemReply {
            problem: Some(Problem {
                title,
                description: "<p>d</p>".into(),
            }),
            ..ProblemReply::default()
        }),
        "[a-z ]{1,12}".prop_map(|raw| ProblemReply {
            raw: Some(raw),
            ..ProblemReply::default()
        }),
        "[a-z ]{1,12}".prop_map(|error| ProblemReply {
            error: Some(error),
            ..ProblemReply::default()
        }),
    ];
    prop_oneof![
        3 => reply.prop_map(Ok::<_, ServiceError>),
        1 => arb_service_error().prop_map(Err),
    ]
}

fn arb_purpose() -> impl Strategy<Value = ReplyPurpose> {
    prop_oneof![
        Just(ReplyPurpose::Chat),
        (0usize..6).prop_map(|placeholder| ReplyPurpose::Evaluation { placeholder }),
    ]
}

fn arb_user_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        "[0-9]{1,4}".prop_map(|text| Action::RequestProblem { text }),
        arb_language().prop_map(Action::ChooseLanguage),
        "[a-zA-Z ]{0,20}".prop_map(|text| Action::SendMessage { text }),
        arb_language().prop_map(Action::ChangeLanguage),
        "[a-z;(){} ]{0,20}".prop_map(Action::EditCode),
        Just(Action::EvaluateCode),
        Just(Action::CompleteInterview),
        Just(Action::GenerateFeedback),
        Just(Action::Reset),
        "[0-9]{1,4}".prop_map(|id| Action::SelectRelatedProblem { id }),
    ]
}

type TextResult = Result<TextReply, ServiceError>;

fn problem_loaded((epoch, result): (u64, Result<ProblemReply, ServiceError>)) -> Action {
    Action::ProblemLoaded { epoch, result }
}

fn assistant_replied((epoch, purpose, result): (u64, ReplyPurpose, TextResult)) -> Action {
    Action::AssistantReplied {
        epoch,
        purpose,
        result,
    }
}

fn feedback_ready((epoch, result): (u64, TextResult)) -> Action {
    Action::FeedbackReady { epoch, result }
}

fn arb_result_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u64..4, arb_problem_reply()).prop_map(problem_loaded),
        (0u64..4, arb_purpose(), arb_text_reply()).prop_map(assistant_replied),
        (0u64..4, arb_text_reply()).prop_map(feedback_ready),
        (0u64..6).prop_map(|generation| Action::CountdownTick { generation }),
        (0u64..4).prop_map(|epoch| Action::AutoComplete { epoch }),
        (0u64..4).prop_map(|epoch| Action::DeferredClear { epoch }),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![arb_user_action(), arb_result_action()]
}

/// Drives a session through `actions`, ignoring rejections.
fn run(actions: Vec<Action>, ctx: &SessionContext) -> Vec<Session> {
    let mut session = Session::default();
    let mut seen = vec![session.clone()];
    for action in actions {
        if let Ok(result) = transition(&session, ctx, action) {
            session = result.session;
            seen.push(session.clone());
        }
    }
    seen
}

fn with_result_epoch(action: Action, epoch: u64) -> Action {
    match action {
        Action::ProblemLoaded { result, .. } => Action::ProblemLoaded { epoch, result },
        Action::AssistantReplied { purpose, result, .. } => Action::AssistantReplied {
            epoch,
            purpose,
            result,
        },
        Action::FeedbackReady { result, .. } => Action::FeedbackReady { epoch, result },
        Action::AutoComplete { .. } => Action::AutoComplete { epoch },
        Action::DeferredClear { .. } => Action::DeferredClear { epoch },
        other => other,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_countdown_stays_within_interview_length(
        actions in proptest::collection::vec(arb_action(), 0..40)
    ) {
        let ctx = SessionContext::default();
        for session in run(actions, &ctx) {
            prop_assert!(session.time_remaining() <= ctx.interview_seconds());
            if session.screen == Screen::Feedback {
                prop_assert_eq!(session.time_remaining(), 0, "clock running on feedback screen");
            }
        }
    }

    #[test]
    fn prop_epoch_never_decreases(actions in proptest::collection::vec(arb_action(), 0..40)) {
        let sessions = run(actions, &SessionContext::default());
        for pair in sessions.windows(2) {
            prop_assert!(pair[1].epoch >= pair[0].epoch);
        }
    }

    #[test]
    fn prop_stale_results_change_nothing(
        actions in proptest::collection::vec(arb_action(), 0..20),
        result in arb_result_action(),
    ) {
        let ctx = SessionContext::default();
        let session = run(actions, &ctx).pop().unwrap_or_default();
        if session.epoch == 0 {
            return Ok(());
        }
        let stale = with_result_epoch(result, session.epoch - 1);
        if matches!(stale, Action::CountdownTick { .. }) {
            return Ok(());
        }
        let outcome = transition(&session, &ctx, stale).unwrap();
        prop_assert_eq!(outcome.session, session);
        prop_assert!(outcome.effects.is_empty());
    }

    #[test]
    fn prop_busy_rejects_turns_and_keeps_session(
        actions in proptest::collection::vec(arb_action(), 0..20),
        text in "[a-zA-Z]{1,20}",
        language in arb_language(),
    ) {
        let ctx = SessionContext::default();
        let mut session = run(actions, &ctx).pop().unwrap_or_default();
        session.screen = Screen::Interview;
        session.is_awaiting_assistant = true;
        let before = session.clone();

        let turn = transition(&session, &ctx, Action::SendMessage { text });
        prop_assert_eq!(turn.unwrap_err(), TransitionError::Busy);
        if language != session.language {
            let switch = transition(&session, &ctx, Action::ChangeLanguage(language));
            prop_assert_eq!(switch.unwrap_err(), TransitionError::Busy);
        }
        prop_assert_eq!(session, before);
    }

    #[test]
    fn prop_reset_always_yields_clean_session(
        actions in proptest::collection::vec(arb_action(), 0..30)
    ) {
        let ctx = SessionContext::default();
        let session = run(actions, &ctx).pop().unwrap_or_default();
        let result = transition(&session, &ctx, Action::Reset).unwrap();
        let next = result.session;
        prop_assert!(next.transcript.is_empty());
        prop_assert!(next.problem.is_none());
        prop_assert!(next.feedback.is_none());
        prop_assert!(!next.is_busy() && !next.is_generating_feedback);
        prop_assert_eq!(next.time_remaining(), 0);
        prop_assert_eq!(next.language, session.language);
        prop_assert_eq!(next.code, session.language.template());
        prop_assert_eq!(next.epoch, session.epoch + 1);
    }

    #[test]
    fn prop_chat_turns_append_exactly_one_message(text in "[a-zA-Z][a-zA-Z ]{0,20}") {
        let mut session = Session::default();
        session.problem = Some(Problem { title: "Two Sum".into(), description: String::new() });
        let result = transition(
            &session,
            &SessionContext::default(),
            Action::SendMessage { text: text.clone() },
        )
        .unwrap();
        prop_assert_eq!(result.session.transcript.len(), 1);
        prop_assert_eq!(&result.session.transcript[0].content, &text);
        prop_assert_eq!(result.effects.len(), 1);
    }
}
