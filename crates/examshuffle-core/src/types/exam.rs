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

use serde::Deserialize;
use serde::Serialize;

use crate::types::question::Question;
use crate::types::question::QuestionId;

fn default_randomize() -> bool {
    true
}

/// An exam as served: its questions in their stored order. That order is
/// part of the shuffle contract, since one random stream is consumed across
/// questions in sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_randomize")]
    pub randomize_options: bool,
    pub questions: Vec<Question>,
}

impl Exam {
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Ids that occur more than once, in first-seen order.
    pub fn duplicate_question_ids(&self) -> Vec<QuestionId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for q in &self.questions {
            if !seen.insert(q.id) && !duplicates.contains(&q.id) {
                duplicates.push(q.id);
            }
        }
        duplicates
    }
}
