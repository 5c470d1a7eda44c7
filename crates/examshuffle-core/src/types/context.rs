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

use crate::types::secret::ServerSecret;

/// Identifies exactly one randomization instance: one student's attempt at
/// one exam, under one server secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleContext {
    pub exam_id: i64,
    pub student_id: String,
    pub attempt_number: u32,
    pub secret: ServerSecret,
}

impl ShuffleContext {
    pub fn new(
        exam_id: i64,
        student_id: impl Into<String>,
        attempt_number: u32,
        secret: ServerSecret,
    ) -> Self {
        Self {
            exam_id,
            student_id: student_id.into(),
            attempt_number,
            secret,
        }
    }

    /// The string the seed is computed over. The colon cannot appear in an
    /// integer, so distinct triples never share a preimage.
    pub fn preimage(&self) -> String {
        format!(
            "{}:{}:{}",
            self.exam_id, self.student_id, self.attempt_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_preimage() -> Fallible<()> {
        let ctx = ShuffleContext::new(7, "s42", 1, ServerSecret::new("k")?);
        assert_eq!(ctx.preimage(), "7:s42:1");
        Ok(())
    }
}
