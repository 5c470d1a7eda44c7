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

//! The two shapes a question is served in.
//!
//! Students get [`StudentQuestion`], which has no answer-key fields at all.
//! Instructors and graders get [`GradingQuestion`], whose answer key has been
//! rewritten into the student's presented coordinates.

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::answer::AnswerInput;
use crate::answer::AnswerValue;
use crate::builder::PermutationMapping;
use crate::builder::build_exam_permutations;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::context::ShuffleContext;
use crate::types::exam::Exam;
use crate::types::index::CanonicalIndex;
use crate::types::layout_hash::ExamLayoutHash;
use crate::types::permutation::InversePermutation;
use crate::types::permutation::Permutation;
use crate::types::question::ANSWER_KEY_FIELDS;
use crate::types::question::Question;
use crate::types::question::QuestionId;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuestion {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Audit record of how a question was shuffled. Instructor-only.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleDebug {
    pub permutation: Permutation,
    pub inverse_permutation: InversePermutation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_correct_answer: Option<AnswerInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_correct_answers: Option<Vec<AnswerValue>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingQuestion {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// In presented coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerInput>,
    /// In presented coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<AnswerValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_debug: Option<ShuffleDebug>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentExam {
    pub id: i64,
    pub title: String,
    pub attempt_number: u32,
    pub questions: Vec<StudentQuestion>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingExam {
    pub id: i64,
    pub title: String,
    pub student_id: String,
    pub attempt_number: u32,
    pub layout_hash: ExamLayoutHash,
    pub questions: Vec<GradingQuestion>,
}

/// The permutation to use for `question`, if it is shuffled. A permutation
/// whose length no longer matches the options is ignored.
pub fn question_permutation<'a>(
    question: &Question,
    mapping: &'a PermutationMapping,
) -> Option<&'a Permutation> {
    let permutation = mapping.get(question.id)?;
    if permutation.len() != question.option_count() {
        log::warn!(
            "question {}: permutation of length {} does not fit {} options; not shuffled",
            question.id,
            permutation.len(),
            question.option_count()
        );
        return None;
    }
    Some(permutation)
}

fn reorder_options(question: &Question, permutation: Option<&Permutation>) -> Option<Vec<String>> {
    let options = question.options.as_ref()?;
    match permutation.and_then(|p| p.apply(options)) {
        Some(reordered) => Some(reordered),
        None => Some(options.clone()),
    }
}

fn without_answer_key(extra: &Map<String, Value>) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(k, _)| !ANSWER_KEY_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Student-facing view: options in presented order, answer key removed.
pub fn apply_permutation_to_question(
    question: &Question,
    mapping: &PermutationMapping,
) -> StudentQuestion {
    let permutation = question_permutation(question, mapping);
    StudentQuestion {
        id: question.id,
        prompt: question.prompt.clone(),
        options: reorder_options(question, permutation),
        points: question.points,
        extra: without_answer_key(&question.extra),
    }
}

fn remap_value(value: &AnswerValue, inverse: &InversePermutation) -> Fallible<AnswerValue> {
    if value.is_blank() {
        return Ok(value.clone());
    }
    let canonical = CanonicalIndex::new(value.to_index()?);
    match inverse.presented_of(canonical) {
        Some(presented) => value.with_index(presented.get()),
        None => fail(format!("answer key refers to missing option: {canonical}")),
    }
}

struct RemappedKey {
    correct_answer: Option<AnswerInput>,
    correct_answers: Option<Vec<AnswerValue>>,
}

fn remap_answer_key(question: &Question, inverse: &InversePermutation) -> Fallible<RemappedKey> {
    let correct_answer = match &question.correct_answer {
        Some(answer) => Some(answer.try_map(|v| remap_value(v, inverse))?),
        None => None,
    };
    let correct_answers = match &question.correct_answers {
        Some(answers) => Some(
            answers
                .iter()
                .map(|v| remap_value(v, inverse))
                .collect::<Fallible<Vec<_>>>()?,
        ),
        None => None,
    };
    Ok(RemappedKey {
        correct_answer,
        correct_answers,
    })
}

/// Instructor/grading view: options in presented order, answer key rewritten
/// into presented coordinates via the inverse permutation, plus an audit
/// record of the shuffle.
pub fn apply_permutation_with_correct_answers(
    question: &Question,
    mapping: &PermutationMapping,
) -> GradingQuestion {
    let unshuffled = || GradingQuestion {
        id: question.id,
        prompt: question.prompt.clone(),
        options: question.options.clone(),
        correct_answer: question.correct_answer.clone(),
        correct_answers: question.correct_answers.clone(),
        points: question.points,
        shuffle_debug: None,
        extra: question.extra.clone(),
    };
    let Some(permutation) = question_permutation(question, mapping) else {
        return unshuffled();
    };
    let inverse = permutation.inverse();
    let key = match remap_answer_key(question, &inverse) {
        Ok(key) => key,
        Err(e) => {
            log::warn!("question {}: {}; not shuffled", question.id, e.message());
            return unshuffled();
        }
    };
    GradingQuestion {
        id: question.id,
        prompt: question.prompt.clone(),
        options: reorder_options(question, Some(permutation)),
        correct_answer: key.correct_answer,
        correct_answers: key.correct_answers,
        points: question.points,
        shuffle_debug: Some(ShuffleDebug {
            permutation: permutation.clone(),
            inverse_permutation: inverse,
            original_correct_answer: question.correct_answer.clone(),
            original_correct_answers: question.correct_answers.clone(),
        }),
        extra: question.extra.clone(),
    }
}

/// Everything one student sees for one attempt.
pub fn student_view(exam: &Exam, context: &ShuffleContext) -> StudentExam {
    let mapping = build_exam_permutations(&exam.questions, context, exam.randomize_options);
    StudentExam {
        id: exam.id,
        title: exam.title.clone(),
        attempt_number: context.attempt_number,
        questions: exam
            .questions
            .iter()
            .map(|q| apply_permutation_to_question(q, &mapping))
            .collect(),
    }
}

/// What an instructor sees for one student's attempt.
pub fn grading_view(exam: &Exam, context: &ShuffleContext) -> GradingExam {
    let mapping = build_exam_permutations(&exam.questions, context, exam.randomize_options);
    GradingExam {
        id: exam.id,
        title: exam.title.clone(),
        student_id: context.student_id.clone(),
        attempt_number: context.attempt_number,
        layout_hash: ExamLayoutHash::of(&exam.questions),
        questions: exam
            .questions
            .iter()
            .map(|q| apply_permutation_with_correct_answers(q, &mapping))
            .collect(),
    }
}
