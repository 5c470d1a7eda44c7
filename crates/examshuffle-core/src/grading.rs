// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turning submitted answers into scores.
//!
//! Submissions are recorded in presented coordinates. They are resolved to
//! canonical indices with the forward permutation (`permutation[presented]`)
//! and compared against the stored answer key. The permutation is rebuilt
//! from the shuffle context, never stored.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::answer::AnswerInput;
use crate::answer::normalize_answer_to_indices;
use crate::builder::PermutationMapping;
use crate::builder::build_exam_permutations;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::context::ShuffleContext;
use crate::types::exam::Exam;
use crate::types::index::CanonicalIndex;
use crate::types::index::PresentedIndex;
use crate::types::layout_hash::ExamLayoutHash;
use crate::types::permutation::Permutation;
use crate::types::question::Question;
use crate::types::question::QuestionId;
use crate::view::question_permutation;

/// A student's answers for one attempt, keyed by question, in the positions
/// the student saw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Layout hash of the exam as presented, if the caller recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_hash: Option<ExamLayoutHash>,
    pub answers: BTreeMap<QuestionId, AnswerInput>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionOutcome {
    Correct,
    Incorrect,
    Unanswered,
    /// The question cannot be graded (no usable answer key).
    Ungradable { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGrade {
    pub question_id: QuestionId,
    #[serde(flatten)]
    pub outcome: QuestionOutcome,
    /// The submission in canonical coordinates, sorted, when it could be
    /// resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_answer: Option<Vec<CanonicalIndex>>,
    pub earned: f64,
    pub possible: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub exam_id: i64,
    pub student_id: String,
    pub attempt_number: u32,
    pub layout_hash: ExamLayoutHash,
    /// `None` when the submission did not record a layout hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_matches: Option<bool>,
    pub earned: f64,
    pub possible: f64,
    pub questions: Vec<QuestionGrade>,
}

/// Resolve presented positions to canonical indices. Without a permutation
/// the question was shown in canonical order.
pub fn resolve_to_canonical(
    presented: &[PresentedIndex],
    permutation: Option<&Permutation>,
    option_count: usize,
) -> Fallible<Vec<CanonicalIndex>> {
    presented
        .iter()
        .map(|&p| {
            if p.get() >= option_count {
                return fail(format!(
                    "{p} is out of range for {option_count} options"
                ));
            }
            match permutation {
                Some(permutation) => match permutation.canonical_of(p) {
                    Some(c) => Ok(c),
                    None => fail(format!("{p} is outside the permutation")),
                },
                None => Ok(CanonicalIndex::new(p.get())),
            }
        })
        .collect()
}

pub fn grade_question(
    question: &Question,
    mapping: &PermutationMapping,
    answer: Option<&AnswerInput>,
) -> QuestionGrade {
    let grade = |outcome: QuestionOutcome, canonical: Option<Vec<CanonicalIndex>>| {
        let possible = match outcome {
            QuestionOutcome::Ungradable { .. } => 0.0,
            _ => question.points(),
        };
        let earned = match outcome {
            QuestionOutcome::Correct => possible,
            _ => 0.0,
        };
        QuestionGrade {
            question_id: question.id,
            outcome,
            canonical_answer: canonical,
            earned,
            possible,
        }
    };

    let key: BTreeSet<CanonicalIndex> = match question.canonical_answer_key() {
        Ok(key) if key.is_empty() => {
            return grade(
                QuestionOutcome::Ungradable {
                    reason: "no answer key".to_string(),
                },
                None,
            );
        }
        Ok(key) => key,
        Err(e) => {
            return grade(
                QuestionOutcome::Ungradable {
                    reason: e.message().to_string(),
                },
                None,
            );
        }
    };
    let Some(answer) = answer else {
        return grade(QuestionOutcome::Unanswered, None);
    };
    let indices = match normalize_answer_to_indices(answer) {
        Ok(indices) => indices,
        Err(e) => {
            log::debug!("question {}: {}", question.id, e.message());
            return grade(QuestionOutcome::Incorrect, None);
        }
    };
    if indices.is_empty() {
        return grade(QuestionOutcome::Unanswered, None);
    }
    let presented: Vec<PresentedIndex> = indices.into_iter().map(PresentedIndex::new).collect();
    let permutation = question_permutation(question, mapping);
    let canonical = match resolve_to_canonical(&presented, permutation, question.option_count()) {
        Ok(canonical) => canonical,
        Err(e) => {
            log::debug!("question {}: {}", question.id, e.message());
            return grade(QuestionOutcome::Incorrect, None);
        }
    };
    let submitted: BTreeSet<CanonicalIndex> = canonical.into_iter().collect();
    let outcome = if submitted == key {
        QuestionOutcome::Correct
    } else {
        QuestionOutcome::Incorrect
    };
    grade(outcome, Some(submitted.into_iter().collect()))
}

/// Grade one attempt. The permutations are rebuilt from `context`, so it
/// must be the same context the attempt was presented with.
pub fn grade_exam(exam: &Exam, context: &ShuffleContext, submission: &Submission) -> GradeReport {
    let layout_hash = ExamLayoutHash::of(&exam.questions);
    let layout_matches = submission.layout_hash.map(|h| h == layout_hash);
    if layout_matches == Some(false) {
        log::warn!(
            "exam {}: layout changed since attempt {} of {} was presented; grading may not match what the student saw",
            exam.id,
            context.attempt_number,
            context.student_id
        );
    }
    for id in submission.answers.keys() {
        if exam.question(*id).is_none() {
            log::warn!("exam {}: answer for unknown question {id} ignored", exam.id);
        }
    }

    let mapping = build_exam_permutations(&exam.questions, context, exam.randomize_options);
    let questions: Vec<QuestionGrade> = exam
        .questions
        .iter()
        .map(|q| grade_question(q, &mapping, submission.answers.get(&q.id)))
        .collect();
    GradeReport {
        exam_id: exam.id,
        student_id: context.student_id.clone(),
        attempt_number: context.attempt_number,
        layout_hash,
        layout_matches,
        earned: questions.iter().map(|q| q.earned).sum(),
        possible: questions.iter().map(|q| q.possible).sum(),
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerValue;
    use crate::answer::index_to_letter;
    use crate::builder::tests::context;
    use crate::builder::tests::questions;

    fn exam(randomize: bool) -> Exam {
        Exam {
            id: 7,
            title: String::new(),
            randomize_options: randomize,
            questions: questions(),
        }
    }

    fn letter(i: usize) -> AnswerInput {
        AnswerInput::One(AnswerValue::Text(index_to_letter(i).unwrap().to_string()))
    }

    /// Answers a student would give by clicking the right options on screen.
    fn perfect_submission(exam: &Exam, ctx: &ShuffleContext) -> Submission {
        let mapping = build_exam_permutations(&exam.questions, ctx, exam.randomize_options);
        let mut answers = BTreeMap::new();
        for q in &exam.questions {
            let Ok(key) = q.canonical_answer_key() else {
                continue;
            };
            let inverse = question_permutation(q, &mapping)
                .map(Permutation::inverse)
                .unwrap_or_else(|| Permutation::identity(q.option_count()).inverse());
            let presented: Vec<AnswerValue> = key
                .iter()
                .map(|&k| {
                    let p = inverse.presented_of(k).unwrap().get();
                    AnswerValue::Text(index_to_letter(p).unwrap().to_string())
                })
                .collect();
            if !presented.is_empty() {
                answers.insert(q.id, AnswerInput::Many(presented));
            }
        }
        Submission {
            layout_hash: Some(ExamLayoutHash::of(&exam.questions)),
            answers,
        }
    }

    #[test]
    fn test_resolve_uses_forward_permutation() -> Fallible<()> {
        let p = Permutation::try_from(vec![2, 0, 1])?;
        let presented = [PresentedIndex::new(0), PresentedIndex::new(2)];
        let canonical = resolve_to_canonical(&presented, Some(&p), 3)?;
        assert_eq!(canonical, vec![CanonicalIndex::new(2), CanonicalIndex::new(1)]);
        // The inverse would give [1, 0]; make sure that's not what we got.
        let inv = p.inverse();
        assert_ne!(canonical[0].get(), inv.as_slice()[0]);
        Ok(())
    }

    #[test]
    fn test_resolve_without_permutation() -> Fallible<()> {
        let canonical = resolve_to_canonical(&[PresentedIndex::new(1)], None, 2)?;
        assert_eq!(canonical, vec![CanonicalIndex::new(1)]);
        assert!(resolve_to_canonical(&[PresentedIndex::new(2)], None, 2).is_err());
        Ok(())
    }

    #[test]
    fn test_perfect_score_for_many_students() {
        let exam = exam(true);
        for student in 0..30 {
            for attempt in 1..3 {
                let ctx = context(7, &format!("s{student}"), attempt);
                let report = grade_exam(&exam, &ctx, &perfect_submission(&exam, &ctx));
                // Questions 1, 3, 4 and 5 have keys; question 2 is free text.
                assert_eq!(report.possible, 4.0);
                assert_eq!(report.earned, 4.0);
                assert_eq!(report.layout_matches, Some(true));
            }
        }
    }

    #[test]
    fn test_answers_from_another_attempt_are_not_trusted() {
        // Replaying another student's screen positions should usually fail
        // on at least one multi-option question.
        let exam = exam(true);
        let mut differing = 0;
        for student in 0..50 {
            let mine = context(7, &format!("s{student}"), 1);
            let theirs = context(7, &format!("t{student}"), 1);
            let report = grade_exam(&exam, &mine, &perfect_submission(&exam, &theirs));
            if report.earned < report.possible {
                differing += 1;
            }
        }
        assert!(differing >= 40, "only {differing}/50 replays were caught");
    }

    #[test]
    fn test_correct_answer_by_option_text() {
        let exam = exam(true);
        let ctx = context(7, "s42", 1);
        let mapping = build_exam_permutations(&exam.questions, &ctx, true);
        let q1 = &exam.questions[0];
        let view = crate::view::apply_permutation_to_question(q1, &mapping);
        let position = view
            .options
            .as_ref()
            .unwrap()
            .iter()
            .position(|o| o == "Paris")
            .unwrap();
        let grade = grade_question(q1, &mapping, Some(&letter(position)));
        assert_eq!(grade.outcome, QuestionOutcome::Correct);
        assert_eq!(grade.canonical_answer, Some(vec![CanonicalIndex::new(0)]));

        let wrong = (position + 1) % 4;
        let grade = grade_question(q1, &mapping, Some(&letter(wrong)));
        assert_eq!(grade.outcome, QuestionOutcome::Incorrect);
        assert_eq!(grade.earned, 0.0);
    }

    #[test]
    fn test_unanswered_and_garbage() {
        let exam = exam(false);
        let mapping = PermutationMapping::empty();
        let q1 = &exam.questions[0];
        assert_eq!(
            grade_question(q1, &mapping, None).outcome,
            QuestionOutcome::Unanswered
        );
        let blank = AnswerInput::One(AnswerValue::Text(" ".to_string()));
        assert_eq!(
            grade_question(q1, &mapping, Some(&blank)).outcome,
            QuestionOutcome::Unanswered
        );
        let garbage = AnswerInput::One(AnswerValue::Text("Paris".to_string()));
        assert_eq!(
            grade_question(q1, &mapping, Some(&garbage)).outcome,
            QuestionOutcome::Incorrect
        );
        assert_eq!(
            grade_question(q1, &mapping, Some(&letter(9))).outcome,
            QuestionOutcome::Incorrect
        );
    }

    #[test]
    fn test_partial_multi_select_is_incorrect() {
        let exam = exam(false);
        let mapping = PermutationMapping::empty();
        let q3 = &exam.questions[2];
        let partial = AnswerInput::Many(vec![AnswerValue::Index(0), AnswerValue::Index(1)]);
        assert_eq!(
            grade_question(q3, &mapping, Some(&partial)).outcome,
            QuestionOutcome::Incorrect
        );
        let full = AnswerInput::Many(vec![
            AnswerValue::Index(3),
            AnswerValue::Index(0),
            AnswerValue::Index(1),
        ]);
        assert_eq!(
            grade_question(q3, &mapping, Some(&full)).outcome,
            QuestionOutcome::Correct
        );
    }

    #[test]
    fn test_ungradable() {
        let exam = exam(true);
        let grade = grade_question(&exam.questions[1], &PermutationMapping::empty(), None);
        assert_eq!(
            grade.outcome,
            QuestionOutcome::Ungradable {
                reason: "no answer key".to_string()
            }
        );
        assert_eq!(grade.possible, 0.0);
    }

    #[test]
    fn test_layout_drift_is_reported() {
        let exam = exam(true);
        let ctx = context(7, "s42", 1);
        let mut submission = perfect_submission(&exam, &ctx);
        submission.layout_hash = Some(ExamLayoutHash::of(&[]));
        let report = grade_exam(&exam, &ctx, &submission);
        assert_eq!(report.layout_matches, Some(false));
        submission.layout_hash = None;
        let report = grade_exam(&exam, &ctx, &submission);
        assert_eq!(report.layout_matches, None);
    }

    #[test]
    fn test_submission_json() -> Fallible<()> {
        let submission: Submission =
            serde_json::from_str(r#"{"answers": {"1": "B", "3": ["A", 2]}}"#)?;
        assert_eq!(submission.answers.len(), 2);
        assert_eq!(
            submission.answers.get(&QuestionId::new(1)),
            Some(&AnswerInput::One(AnswerValue::Text("B".to_string())))
        );
        assert!(submission.layout_hash.is_none());
        Ok(())
    }

    #[test]
    fn test_report_json() -> Fallible<()> {
        let exam = exam(true);
        let ctx = context(7, "s42", 1);
        let report = grade_exam(&exam, &ctx, &Submission::default());
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["questions"][0]["status"], "unanswered");
        assert_eq!(json["questions"][1]["status"], "ungradable");
        assert_eq!(json["questions"][1]["reason"], "no answer key");
        assert_eq!(json["earned"], 0.0);
        Ok(())
    }
}
