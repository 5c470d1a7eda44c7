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

use std::path::Path;

use examshuffle_core::error::Fallible;
use examshuffle_core::grading::Submission;
use examshuffle_core::grading::grade_exam;
use examshuffle_core::types::exam::Exam;

use crate::cmd::AttemptSpec;
use crate::config::Config;
use crate::utils::read_json;
use crate::utils::write_json;

pub fn grade_attempt(
    config: &Config,
    exam_path: &Path,
    answers_path: &Path,
    attempt: AttemptSpec,
    output: Option<&Path>,
) -> Fallible<()> {
    let exam: Exam = read_json(exam_path)?;
    let submission: Submission = read_json(answers_path)?;
    let context = attempt.context(&exam, config);
    let report = grade_exam(&exam, &context, &submission);
    log::info!(
        "exam {}: {} attempt {} scored {}/{}",
        exam.id,
        context.student_id,
        context.attempt_number,
        report.earned,
        report.possible
    );
    write_json(&report, output)
}
