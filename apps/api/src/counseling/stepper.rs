//! The counseling state machine.
//!
//! Walks the `FIELD_ORDER` table one answer at a time: validate the raw
//! answer, store it under the current field key, advance, and emit the next
//! prompt. The tokens `edit` / `change` / `back` open an edit side-channel
//! that re-targets a previously answered field without disturbing the main
//! cursor. Control inputs are not logged to the transcript; normal answers
//! and all bot messages are.

use crate::counseling::flow::{field_index, Phase, FIELD_ORDER};
use crate::counseling::session::{CounselingSession, Step};

/// Inputs that open the edit side-channel while collecting.
pub const EDIT_TOKENS: &[&str] = &["edit", "change", "back"];

const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

const GREETING: &str = "Hi! I'm Compass, your career counselor. I'll ask you 13 quick questions \
     about your personality, aptitudes, and work style, then suggest the careers \
     that fit you best. You can type 'edit' at any time to change an earlier answer.";

const COMPLETION_MESSAGE: &str =
    "That's everything I need — give me a moment to analyze your answers.";

const SCORE_GUIDANCE: &str = "Please answer with a number from 1 to 10.";

/// What the counselor says back after one user input.
#[derive(Debug, Clone)]
pub struct CounselorTurn {
    pub message: Option<String>,
    pub next_question: Option<String>,
    /// Key of the field the next question targets, if any.
    pub field: Option<&'static str>,
    pub step: Step,
    pub completed: bool,
    pub show_edit_option: bool,
    /// Numbered list of answered fields, present only in `choosing_field`.
    pub edit_options: Option<Vec<String>>,
}

/// Creates a fresh session and the opening greeting + first prompt.
pub fn start() -> (CounselingSession, CounselorTurn) {
    let mut session = CounselingSession::new();
    let first = &FIELD_ORDER[0];

    session.log_bot(GREETING);
    session.log_bot(first.prompt);

    let turn = CounselorTurn {
        message: Some(GREETING.to_string()),
        next_question: Some(first.prompt.to_string()),
        field: Some(first.key),
        step: Step::Personality,
        completed: false,
        show_edit_option: false,
        edit_options: None,
    };
    (session, turn)
}

/// Advances the session by one user input.
pub fn process_answer(session: &mut CounselingSession, raw: &str) -> CounselorTurn {
    let input = raw.trim();

    if session.completed {
        return CounselorTurn {
            message: Some("This counseling session is already complete.".to_string()),
            next_question: None,
            field: None,
            step: Step::Complete,
            completed: true,
            show_edit_option: false,
            edit_options: None,
        };
    }

    match session.step {
        Step::Personality | Step::Aptitude | Step::WorkStyle => {
            handle_collecting(session, input)
        }
        Step::ChoosingField => handle_field_choice(session, input),
        Step::Editing => handle_edit_value(session, input),
        Step::Complete => unreachable!("completed sessions return early"),
    }
}

fn handle_collecting(session: &mut CounselingSession, input: &str) -> CounselorTurn {
    let current = &FIELD_ORDER[session.next_field];

    if is_edit_token(input) {
        // Side-channel: not logged as a user turn.
        if session.answers.is_empty() {
            let message = "There's nothing to change yet — let's answer the first question.";
            session.log_bot(message);
            return CounselorTurn {
                message: Some(message.to_string()),
                next_question: Some(current.prompt.to_string()),
                field: Some(current.key),
                step: session.step,
                completed: false,
                show_edit_option: false,
                edit_options: None,
            };
        }
        session.step = Step::ChoosingField;
        let message = "Which answer would you like to change? Reply with its number or name.";
        session.log_bot(message);
        return CounselorTurn {
            message: Some(message.to_string()),
            next_question: None,
            field: None,
            step: Step::ChoosingField,
            completed: false,
            show_edit_option: false,
            edit_options: Some(answered_options(session)),
        };
    }

    session.log_user(input);

    let score = match parse_score(input) {
        Some(s) => s,
        None => {
            session.log_bot(SCORE_GUIDANCE);
            return CounselorTurn {
                message: Some(SCORE_GUIDANCE.to_string()),
                next_question: Some(current.prompt.to_string()),
                field: Some(current.key),
                step: session.step,
                completed: false,
                show_edit_option: !session.answers.is_empty(),
                edit_options: None,
            };
        }
    };

    let previous_phase = current.phase;
    session.answers.insert(current.key.to_string(), score);
    session.next_field += 1;

    if session.next_field >= FIELD_ORDER.len() {
        session.step = Step::Complete;
        session.completed = true;
        session.log_bot(COMPLETION_MESSAGE);
        return CounselorTurn {
            message: Some(COMPLETION_MESSAGE.to_string()),
            next_question: None,
            field: None,
            step: Step::Complete,
            completed: true,
            show_edit_option: false,
            edit_options: None,
        };
    }

    let next = &FIELD_ORDER[session.next_field];
    let message = if next.phase != previous_phase {
        let intro = next.phase.intro();
        session.log_bot(intro);
        Some(intro.to_string())
    } else {
        None
    };
    session.log_bot(next.prompt);
    session.step = phase_step(next.phase);

    CounselorTurn {
        message,
        next_question: Some(next.prompt.to_string()),
        field: Some(next.key),
        step: session.step,
        completed: false,
        show_edit_option: true,
        edit_options: None,
    }
}

fn handle_field_choice(session: &mut CounselingSession, input: &str) -> CounselorTurn {
    // Selection is side-channel input: never logged as a user turn.
    let answered: Vec<usize> = (0..FIELD_ORDER.len())
        .filter(|&i| session.answers.contains_key(FIELD_ORDER[i].key))
        .collect();

    let chosen = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| answered.get(n).copied())
        .or_else(|| field_index(input).filter(|i| answered.contains(i)));

    let Some(target) = chosen else {
        let message = "I didn't catch that. Reply with the number or name of the answer to change.";
        session.log_bot(message);
        return CounselorTurn {
            message: Some(message.to_string()),
            next_question: None,
            field: None,
            step: Step::ChoosingField,
            completed: false,
            show_edit_option: false,
            edit_options: Some(answered_options(session)),
        };
    };

    session.edit_target = Some(target);
    session.step = Step::Editing;
    let spec = &FIELD_ORDER[target];
    let message = format!("Sure — let's update {}.", spec.label);
    session.log_bot(message.as_str());
    session.log_bot(spec.prompt);

    CounselorTurn {
        message: Some(message),
        next_question: Some(spec.prompt.to_string()),
        field: Some(spec.key),
        step: Step::Editing,
        completed: false,
        show_edit_option: false,
        edit_options: None,
    }
}

fn handle_edit_value(session: &mut CounselingSession, input: &str) -> CounselorTurn {
    // A deserialized session may carry an editing step without a valid
    // target; recover by resuming the main questionnaire.
    let Some(spec) = session.edit_target.and_then(|t| FIELD_ORDER.get(t)) else {
        session.edit_target = None;
        let current = &FIELD_ORDER[session.next_field];
        session.step = phase_step(current.phase);
        session.log_bot(current.prompt);
        return CounselorTurn {
            message: None,
            next_question: Some(current.prompt.to_string()),
            field: Some(current.key),
            step: session.step,
            completed: false,
            show_edit_option: !session.answers.is_empty(),
            edit_options: None,
        };
    };

    session.log_user(input);

    let score = match parse_score(input) {
        Some(s) => s,
        None => {
            session.log_bot(SCORE_GUIDANCE);
            return CounselorTurn {
                message: Some(SCORE_GUIDANCE.to_string()),
                next_question: Some(spec.prompt.to_string()),
                field: Some(spec.key),
                step: Step::Editing,
                completed: false,
                show_edit_option: false,
                edit_options: None,
            };
        }
    };

    session.answers.insert(spec.key.to_string(), score);
    session.edit_target = None;

    // Resume at the next unasked field; the cursor never moved.
    let next = &FIELD_ORDER[session.next_field];
    session.step = phase_step(next.phase);
    let message = format!("Updated {} to {}.", spec.label, score);
    session.log_bot(message.as_str());
    session.log_bot(next.prompt);

    CounselorTurn {
        message: Some(message),
        next_question: Some(next.prompt.to_string()),
        field: Some(next.key),
        step: session.step,
        completed: false,
        show_edit_option: true,
        edit_options: None,
    }
}

fn is_edit_token(input: &str) -> bool {
    let lower = input.to_lowercase();
    EDIT_TOKENS.contains(&lower.as_str())
}

fn parse_score(input: &str) -> Option<f64> {
    let score = input.trim().parse::<f64>().ok()?;
    (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(score)
}

fn phase_step(phase: Phase) -> Step {
    match phase {
        Phase::Personality => Step::Personality,
        Phase::Aptitude => Step::Aptitude,
        Phase::WorkStyle => Step::WorkStyle,
    }
}

fn answered_options(session: &CounselingSession) -> Vec<String> {
    FIELD_ORDER
        .iter()
        .filter(|f| session.answers.contains_key(f.key))
        .enumerate()
        .map(|(i, f)| {
            format!(
                "{}. {} (currently {})",
                i + 1,
                f.label,
                session.answers[f.key]
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counseling::session::Speaker;

    fn run_to_completion(session: &mut CounselingSession) -> CounselorTurn {
        let mut last = None;
        while !session.completed {
            last = Some(process_answer(session, "7"));
        }
        last.unwrap()
    }

    #[test]
    fn test_start_emits_greeting_and_first_prompt() {
        let (session, turn) = start();
        assert_eq!(turn.field, Some("O_score"));
        assert_eq!(turn.step, Step::Personality);
        assert!(!turn.completed);
        // Greeting + first prompt both logged as bot turns.
        assert_eq!(session.transcript.len(), 2);
        assert!(session
            .transcript
            .iter()
            .all(|t| t.speaker == Speaker::Bot));
    }

    #[test]
    fn test_full_run_never_reasks_a_field() {
        let (mut session, start_turn) = start();
        let mut asked = vec![start_turn.field.unwrap()];

        loop {
            let turn = process_answer(&mut session, "6");
            if turn.completed {
                break;
            }
            let field = turn.field.unwrap();
            assert!(
                !asked.contains(&field),
                "field {field} was asked twice without an edit"
            );
            asked.push(field);
        }

        assert_eq!(asked.len(), FIELD_ORDER.len());
        assert_eq!(session.answers.len(), FIELD_ORDER.len());
        assert!(session.completed);
    }

    #[test]
    fn test_phase_intros_emitted_on_transition() {
        let (mut session, _) = start();
        let mut intros = Vec::new();
        loop {
            let turn = process_answer(&mut session, "5");
            if let Some(msg) = &turn.message {
                intros.push(msg.clone());
            }
            if turn.completed {
                break;
            }
        }
        assert!(intros.iter().any(|m| m == Phase::Aptitude.intro()));
        assert!(intros.iter().any(|m| m == Phase::WorkStyle.intro()));
    }

    #[test]
    fn test_invalid_answer_reasks_same_field() {
        let (mut session, _) = start();
        let turn = process_answer(&mut session, "definitely");
        assert_eq!(turn.field, Some("O_score"));
        assert_eq!(turn.message.as_deref(), Some(SCORE_GUIDANCE));
        assert!(session.answers.is_empty());
        assert_eq!(session.next_field, 0);
    }

    #[test]
    fn test_out_of_range_answer_rejected() {
        let (mut session, _) = start();
        let turn = process_answer(&mut session, "11");
        assert_eq!(turn.field, Some("O_score"));
        assert!(session.answers.is_empty());

        let turn = process_answer(&mut session, "0.5");
        assert_eq!(turn.field, Some("O_score"));
        assert!(session.answers.is_empty());
    }

    #[test]
    fn test_fractional_answer_accepted() {
        let (mut session, _) = start();
        process_answer(&mut session, "7.5");
        assert_eq!(session.answers["O_score"], 7.5);
    }

    #[test]
    fn test_edit_with_no_answers_is_refused() {
        let (mut session, _) = start();
        let turn = process_answer(&mut session, "edit");
        assert_eq!(turn.step, Step::Personality);
        assert_eq!(turn.field, Some("O_score"));
        assert!(turn.edit_options.is_none());
    }

    #[test]
    fn test_edit_flow_retargets_and_resumes() {
        let (mut session, _) = start();
        process_answer(&mut session, "3"); // O_score
        process_answer(&mut session, "8"); // C_score

        let turn = process_answer(&mut session, "edit");
        assert_eq!(turn.step, Step::ChoosingField);
        let options = turn.edit_options.unwrap();
        assert_eq!(options.len(), 2);
        assert!(options[0].contains("Openness"));

        let turn = process_answer(&mut session, "1");
        assert_eq!(turn.step, Step::Editing);
        assert_eq!(turn.field, Some("O_score"));

        let turn = process_answer(&mut session, "9");
        assert_eq!(session.answers["O_score"], 9.0);
        // Resumes at the third question — the cursor never moved.
        assert_eq!(turn.field, Some("E_score"));
        assert_eq!(turn.step, Step::Personality);
    }

    #[test]
    fn test_edit_selection_by_label() {
        let (mut session, _) = start();
        process_answer(&mut session, "4");
        process_answer(&mut session, "edit");
        let turn = process_answer(&mut session, "openness");
        assert_eq!(turn.step, Step::Editing);
        assert_eq!(turn.field, Some("O_score"));
    }

    #[test]
    fn test_invalid_edit_selection_reprompts() {
        let (mut session, _) = start();
        process_answer(&mut session, "4");
        process_answer(&mut session, "edit");

        // Unanswered field is not a valid target.
        let turn = process_answer(&mut session, "teamwork");
        assert_eq!(turn.step, Step::ChoosingField);
        assert!(turn.edit_options.is_some());

        let turn = process_answer(&mut session, "99");
        assert_eq!(turn.step, Step::ChoosingField);
    }

    #[test]
    fn test_edit_tokens_not_logged_numeric_answers_are() {
        let (mut session, _) = start();
        process_answer(&mut session, "6");
        process_answer(&mut session, "edit");
        process_answer(&mut session, "1");
        process_answer(&mut session, "8");

        let user_turns: Vec<_> = session
            .transcript
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .map(|t| t.message.as_str())
            .collect();
        // "edit" and the field selection are side-channel; both values logged.
        assert_eq!(user_turns, vec!["6", "8"]);
    }

    #[test]
    fn test_completed_session_stays_complete() {
        let (mut session, _) = start();
        let turn = run_to_completion(&mut session);
        assert!(turn.completed);
        assert_eq!(turn.step, Step::Complete);

        let turn = process_answer(&mut session, "5");
        assert!(turn.completed);
        assert_eq!(session.answers.len(), FIELD_ORDER.len());
    }

    #[test]
    fn test_editing_without_target_resumes_questionnaire() {
        // A stored session can round-trip with an editing step but no
        // usable target; the stepper must recover, not panic.
        let (mut session, _) = start();
        process_answer(&mut session, "6");

        session.step = Step::Editing;
        session.edit_target = None;
        let turn = process_answer(&mut session, "9");
        assert_eq!(turn.field, Some("C_score"));
        assert_eq!(turn.step, Step::Personality);
        assert_eq!(session.answers.len(), 1);

        session.step = Step::Editing;
        session.edit_target = Some(FIELD_ORDER.len() + 5);
        let turn = process_answer(&mut session, "9");
        assert_eq!(turn.field, Some("C_score"));
        assert!(session.edit_target.is_none());
    }

    #[test]
    fn test_case_insensitive_edit_tokens() {
        let (mut session, _) = start();
        process_answer(&mut session, "5");
        let turn = process_answer(&mut session, "CHANGE");
        assert_eq!(turn.step, Step::ChoosingField);
    }
}
