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

pub mod check;
pub mod grade;
pub mod present;

use examshuffle_core::types::context::ShuffleContext;
use examshuffle_core::types::exam::Exam;

use crate::config::Config;

/// Which student and which attempt a command is about.
pub struct AttemptSpec {
    pub student_id: String,
    pub attempt_number: u32,
}

impl AttemptSpec {
    pub fn context(&self, exam: &Exam, config: &Config) -> ShuffleContext {
        ShuffleContext::new(
            exam.id,
            self.student_id.clone(),
            self.attempt_number,
            config.secret.clone(),
        )
    }
}

#[cfg(test)]
pub(crate) mod helper {
    use std::fs::write;
    use std::path::PathBuf;

    use examshuffle_core::error::Fallible;
    use examshuffle_core::types::secret::ServerSecret;
    use tempfile::TempDir;
    use tempfile::tempdir;

    use super::AttemptSpec;
    use crate::config::Config;

    pub const EXAM: &str = r#"{
        "id": 7,
        "title": "Geography",
        "questions": [
            {"id": 1, "prompt": "Capital of France?", "options": ["Paris", "London", "Rome", "Berlin"], "correctAnswer": "A"},
            {"id": 2, "prompt": "Describe a river.", "type": "free_text"},
            {"id": 3, "prompt": "Which are in Europe?", "options": ["Spain", "Peru", "Norway", "Chad"], "correctAnswers": ["A", "C"]}
        ]
    }"#;

    pub fn config() -> Config {
        Config {
            secret: ServerSecret::new("cmd-test-secret").unwrap(),
        }
    }

    pub fn attempt(student: &str, attempt_number: u32) -> AttemptSpec {
        AttemptSpec {
            student_id: student.to_string(),
            attempt_number,
        }
    }

    /// Write `contents` to a fresh file in a temporary directory.
    pub fn scratch_file(name: &str, contents: &str) -> Fallible<(TempDir, PathBuf)> {
        let dir = tempdir()?;
        let path = dir.path().join(name);
        write(&path, contents)?;
        Ok((dir, path))
    }
}
