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

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

use examshuffle_core::error::Fallible;
use examshuffle_core::error::fail;
use examshuffle_core::types::exam::Exam;
use examshuffle_core::types::layout_hash::ExamLayoutHash;
use examshuffle_core::types::question::Question;

use crate::utils::read_json;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The question will be served unshuffled or cannot be graded.
    Error,
    /// Worth a look, but harmless to shuffling.
    Warning,
}

#[derive(Debug, PartialEq)]
pub struct Problem {
    pub severity: Severity,
    pub message: String,
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{tag}: {}", self.message)
    }
}

fn error(message: String) -> Problem {
    Problem {
        severity: Severity::Error,
        message,
    }
}

fn warning(message: String) -> Problem {
    Problem {
        severity: Severity::Warning,
        message,
    }
}

fn question_problems(question: &Question) -> Vec<Problem> {
    let mut problems = Vec::new();
    let id = question.id;
    let Some(options) = &question.options else {
        if question.has_answer_key() {
            problems.push(error(format!(
                "question {id} has an answer key but no options"
            )));
        }
        return problems;
    };
    if let Err(e) = question.canonical_answer_key() {
        problems.push(error(format!("question {id}: {}", e.message())));
    }
    if question.letter_key_overflows() {
        problems.push(error(format!(
            "question {id} has {} options but its answer key uses letters",
            options.len()
        )));
    }
    if options.len() >= 2 && !question.has_answer_key() {
        problems.push(warning(format!("question {id} has no answer key")));
    }
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.trim()) {
            problems.push(warning(format!(
                "question {id} has the option {:?} more than once",
                option.trim()
            )));
        }
    }
    problems
}

pub fn exam_problems(exam: &Exam) -> Vec<Problem> {
    let mut problems = Vec::new();
    for id in exam.duplicate_question_ids() {
        problems.push(error(format!("question id {id} is used more than once")));
    }
    for question in &exam.questions {
        problems.extend(question_problems(question));
    }
    problems
}

pub fn check_exam(exam_path: &Path) -> Fallible<()> {
    let exam: Exam = read_json(exam_path)?;
    let problems = exam_problems(&exam);
    for problem in &problems {
        println!("{problem}");
    }
    let errors = problems
        .iter()
        .filter(|p| p.severity == Severity::Error)
        .count();
    println!(
        "Exam {}: {} questions, layout {}.",
        exam.id,
        exam.questions.len(),
        ExamLayoutHash::of(&exam.questions)
    );
    if errors > 0 {
        fail(format!("{errors} integrity errors found."))
    } else {
        Ok(())
    }
}
