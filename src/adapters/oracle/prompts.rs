//! Prompt builders for each oracle capability.
//!
//! Every builder returns a `(system, user)` pair. Structured capabilities
//! describe the exact JSON shape they expect so the decoder can validate it.

use crate::domain::analysis::{FactCheckIssue, Tone, ToneClassification};
use crate::domain::conversation::{DraftContext, DraftKind};
use crate::domain::questions::{Question, QuestionSet};
use crate::ports::DependencyQuery;

/// Renders questions and answers as a numbered transcript.
///
/// Skipped questions carry the skip sentinel as their answer, so the model
/// sees the skip explicitly.
pub fn transcript(questions: &[Question]) -> String {
    let mut out = String::new();
    for q in questions {
        out.push_str(&format!("Q{} (id {}): {}\n", position(questions, q), q.id, q.text));
        if q.is_answered() {
            out.push_str(&format!("A: {}\n", q.response));
        } else {
            out.push_str("A: <not answered yet>\n");
        }
    }
    out
}

fn position(questions: &[Question], q: &Question) -> usize {
    questions
        .iter()
        .position(|other| other.id == q.id)
        .map(|i| i + 1)
        .unwrap_or(0)
}

fn kind_label(kind: DraftKind) -> &'static str {
    match kind {
        DraftKind::Email => "an email",
        DraftKind::Message => "a short message",
        DraftKind::Reply => "a reply to the message below",
    }
}

fn external_context_block(context: &DraftContext) -> String {
    match context.external_context() {
        Some(text) => format!("\n\nMessage being replied to:\n\"\"\"\n{}\n\"\"\"", text),
        None => String::new(),
    }
}

pub fn propose_next(questions: &QuestionSet) -> (String, String) {
    let system = r#"You help a user write a piece of text by asking short clarifying questions, one at a time.
Ask only what is needed to write a good result. Never repeat a question that was already asked.
When the answers are sufficient, stop asking.

Reply with JSON only:
{"followup_needed": true, "question": "<the next question>"}
or
{"followup_needed": false, "question": null}"#
        .to_string();

    let user = format!(
        "Questions asked so far:\n{}\nDecide whether another question is needed.",
        transcript(questions.questions())
    );
    (system, user)
}

pub fn classify_tone(questions: &QuestionSet, context: &DraftContext) -> (String, String) {
    let catalog = Tone::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let system = format!(
        r#"You classify the tone a piece of writing should take.
Choose exactly one tone from this list: {}.

Reply with JSON only:
{{"tone": "<tone>", "confidence": 0.0-1.0, "reasoning": "<one sentence>"}}"#,
        catalog
    );

    let user = format!(
        "The user is writing {}.\n\n{}{}",
        kind_label(context.kind),
        transcript(questions.questions()),
        external_context_block(context)
    );
    (system, user)
}

pub fn generate_final_text(
    questions: &QuestionSet,
    context: &DraftContext,
    tone: Option<&ToneClassification>,
) -> (String, String) {
    let tone_line = match tone {
        Some(t) => format!("Write in a {} tone.", t.tone),
        None => "Choose a tone that fits the situation.".to_string(),
    };

    let system = format!(
        "You write {} on the user's behalf using only the facts in their answers. \
         Do not invent names, dates, amounts, or commitments. {} \
         Reply with the finished text only, without commentary.",
        kind_label(context.kind),
        tone_line
    );

    let user = format!(
        "{}{}",
        transcript(questions.questions()),
        external_context_block(context)
    );
    (system, user)
}

pub fn fact_check(questions: &QuestionSet, draft: &str) -> (String, String) {
    let system = r#"You verify a draft against the answers it was written from.
Flag statements that contradict an answer, and claims that no answer supports.
Answers equal to "user has skipped this question" provide no information.

Reply with JSON only:
{"passed": true|false, "issues": [{"kind": "contradiction"|"unsupported_claim"|"omission", "detail": "<what is wrong>", "reference": "<answer or excerpt>"}]}"#
        .to_string();

    let user = format!(
        "Answers:\n{}\nDraft:\n\"\"\"\n{}\n\"\"\"",
        transcript(questions.questions()),
        draft
    );
    (system, user)
}

pub fn correct_text(
    questions: &QuestionSet,
    draft: &str,
    issues: &[FactCheckIssue],
) -> (String, String) {
    let system = "You revise a draft so that it agrees with the user's answers. \
                  Fix every listed issue and change nothing else. \
                  Reply with the revised text only."
        .to_string();

    let issue_list = issues
        .iter()
        .map(|i| {
            if i.reference.is_empty() {
                format!("- [{}] {}", i.kind, i.detail)
            } else {
                format!("- [{}] {} (re: {})", i.kind, i.detail, i.reference)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Answers:\n{}\nDraft:\n\"\"\"\n{}\n\"\"\"\n\nIssues:\n{}",
        transcript(questions.questions()),
        draft,
        issue_list
    );
    (system, user)
}

pub fn analyze_dependencies(query: &DependencyQuery<'_>) -> (String, String) {
    let system = r#"A user edited one of their earlier answers. For every later question, decide whether its answer
may no longer hold because of the edit (AFFECTED) or is still valid (UNAFFECTED).
When unsure, answer AFFECTED.

Reply with JSON only:
{"verdicts": [{"question_id": <id>, "status": "AFFECTED"|"UNAFFECTED", "reasoning": "<short reason>"}]}"#
        .to_string();

    let changed = query
        .questions
        .iter()
        .find(|q| q.id == query.changed_question_id)
        .map(|q| q.text.as_str())
        .unwrap_or_default();

    let downstream: Vec<Question> = query.downstream().cloned().collect();

    let user = format!(
        "Edited question (id {}): {}\nOriginal answer: {}\nNew answer: {}\n\nLater questions:\n{}",
        query.changed_question_id,
        changed,
        query.original_answer,
        query.new_answer,
        transcript(&downstream)
    );
    (system, user)
}
