//! Property tests for question set bookkeeping and dependency truncation.

use std::sync::Arc;

use proptest::prelude::*;

use draftwise::adapters::oracle::MockLanguageOracle;
use draftwise::application::DependencyResolver;
use draftwise::domain::analysis::DependencyVerdict;
use draftwise::domain::foundation::ConversationId;
use draftwise::domain::questions::{QuestionId, QuestionSet, QuestionStatus, SKIP_SENTINEL};
use draftwise::ports::{LanguageOracle, OracleCapability, OracleError};

#[derive(Debug, Clone)]
enum Op {
    Append,
    TruncateAfter(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Append),
        1 => (0usize..12).prop_map(Op::TruncateAfter),
    ]
}

fn answered_set(n: usize) -> QuestionSet {
    let mut set = QuestionSet::with_seed("What would you like to write?");
    set.record_answer(0, "Answer 1").unwrap();
    for i in 1..n {
        set.append_question(format!("Question {}", i + 1));
        set.record_answer(i, format!("Answer {}", i + 1)).unwrap();
    }
    set
}

proptest! {
    #[test]
    fn appended_ids_increase_across_truncation(ops in prop::collection::vec(op(), 0..60)) {
        let mut set = QuestionSet::with_seed("seed");
        let mut last_issued = set.questions()[0].id;

        for op in ops {
            match op {
                Op::Append => {
                    let id = set.append_question("next").id;
                    prop_assert!(id > last_issued);
                    last_issued = id;
                }
                Op::TruncateAfter(index) => set.truncate_after(index),
            }

            let ids: Vec<QuestionId> = set.questions().iter().map(|q| q.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn skip_leaves_exactly_the_prefix(n in 1usize..10, pick in 0usize..10) {
        let index = pick % n;
        let mut set = answered_set(n);
        let before = set.clone();

        set.record_skip(index).unwrap();

        prop_assert_eq!(set.len(), index + 1);
        prop_assert_eq!(set.questions()[index].status, QuestionStatus::Skipped);
        prop_assert_eq!(set.questions()[index].response.as_str(), SKIP_SENTINEL);
        prop_assert_eq!(&set.questions()[..index], &before.questions()[..index]);
    }

    #[test]
    fn truncation_keeps_everything_before_first_affected(n in 2usize..10, changed in 0usize..9, k in 1usize..10) {
        let changed = changed % (n - 1);
        let k = changed + 1 + (k % (n - changed - 1));
        let mut set = answered_set(n);

        let verdicts: Vec<DependencyVerdict> = set.questions()[changed + 1..]
            .iter()
            .enumerate()
            .map(|(offset, q)| {
                if changed + 1 + offset == k {
                    DependencyVerdict::affected(q.id, "")
                } else {
                    DependencyVerdict::unaffected(q.id, "")
                }
            })
            .collect();

        DependencyResolver::apply(&mut set, &verdicts);

        prop_assert_eq!(set.len(), k);
    }

    #[test]
    fn failed_analysis_marks_exactly_later_ids_affected(n in 1usize..10, pick in 0usize..10) {
        let changed = pick % n;
        let set = answered_set(n);
        let changed_id = set.questions()[changed].id;
        let oracle: Arc<dyn LanguageOracle> = Arc::new(
            MockLanguageOracle::new().with_dependency_error(OracleError::malformed(
                OracleCapability::AnalyzeDependencies,
                "not json",
            )),
        );
        let resolver = DependencyResolver::new(oracle);

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let verdicts = runtime.block_on(resolver.resolve(
            ConversationId::new(),
            "old",
            "new",
            changed_id,
            set.questions(),
        ));

        let expected: Vec<QuestionId> = set
            .questions()
            .iter()
            .filter(|q| q.id > changed_id)
            .map(|q| q.id)
            .collect();
        let got: Vec<QuestionId> = verdicts.iter().map(|v| v.question_id).collect();
        prop_assert_eq!(got, expected);
        prop_assert!(verdicts.iter().all(|v| v.is_affected()));
    }
}
