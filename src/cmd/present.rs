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
use examshuffle_core::types::exam::Exam;
use examshuffle_core::view::grading_view;
use examshuffle_core::view::student_view;

use crate::cmd::AttemptSpec;
use crate::config::Config;
use crate::utils::read_json;
use crate::utils::write_json;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Audience {
    /// Options shuffled, no answer key.
    Student,
    /// Options shuffled, answer key in presented order.
    Instructor { include_debug: bool },
}

pub fn present_exam(
    config: &Config,
    exam_path: &Path,
    attempt: AttemptSpec,
    audience: Audience,
    output: Option<&Path>,
) -> Fallible<()> {
    let exam: Exam = read_json(exam_path)?;
    let context = attempt.context(&exam, config);
    log::debug!(
        "presenting exam {} to {} (attempt {}) as {:?}",
        exam.id,
        context.student_id,
        context.attempt_number,
        audience
    );
    match audience {
        Audience::Student => write_json(&student_view(&exam, &context), output),
        Audience::Instructor { include_debug } => {
            let mut view = grading_view(&exam, &context);
            if !include_debug {
                for question in view.questions.iter_mut() {
                    question.shuffle_debug = None;
                }
            }
            write_json(&view, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use serde_json::Value;

    use super::*;
    use crate::cmd::helper::EXAM;
    use crate::cmd::helper::attempt;
    use crate::cmd::helper::config;
    use crate::cmd::helper::scratch_file;

    fn run(audience: Audience, student: &str, attempt_number: u32) -> Fallible<Value> {
        let (dir, exam) = scratch_file("exam.json", EXAM)?;
        let output = dir.path().join("out.json");
        present_exam(
            &config(),
            &exam,
            attempt(student, attempt_number),
            audience,
            Some(&output),
        )?;
        Ok(serde_json::from_str(&read_to_string(&output)?)?)
    }

    #[test]
    fn test_student_output_has_no_key() -> Fallible<()> {
        let json = run(Audience::Student, "s42", 1)?;
        assert_eq!(json["id"], 7);
        assert_eq!(json["attemptNumber"], 1);
        let text = json.to_string();
        assert!(!text.contains("correct"));
        assert!(!text.contains("shuffleDebug"));
        Ok(())
    }

    #[test]
    fn test_student_output_is_stable() -> Fallible<()> {
        assert_eq!(
            run(Audience::Student, "s42", 1)?,
            run(Audience::Student, "s42", 1)?
        );
        Ok(())
    }

    #[test]
    fn test_instructor_output() -> Fallible<()> {
        let json = run(Audience::Instructor { include_debug: true }, "s42", 1)?;
        let q1 = &json["questions"][0];
        let options: Vec<&str> = q1["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_str().unwrap())
            .collect();
        let letter = q1["correctAnswer"].as_str().unwrap();
        let index = (letter.as_bytes()[0] - b'A') as usize;
        assert_eq!(options[index], "Paris");
        assert!(q1["shuffleDebug"]["permutation"].is_array());
        assert!(json["layoutHash"].is_string());
        Ok(())
    }

    #[test]
    fn test_instructor_output_without_debug() -> Fallible<()> {
        let json = run(Audience::Instructor { include_debug: false }, "s42", 1)?;
        assert!(!json.to_string().contains("shuffleDebug"));
        Ok(())
    }

    #[test]
    fn test_missing_exam_file() {
        let result = present_exam(
            &config(),
            Path::new("./derpherp.json"),
            attempt("s42", 1),
            Audience::Student,
            None,
        );
        assert!(result.is_err());
    }
}
