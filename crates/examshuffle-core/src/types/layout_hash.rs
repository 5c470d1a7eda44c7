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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::question::Question;

/// Fingerprint of everything a set of permutations depends on besides the
/// shuffle context: question order, ids, and option counts.
///
/// If the hash recorded when an attempt was presented differs from the hash
/// at grading time, regenerated permutations will not match what the student
/// saw.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExamLayoutHash {
    #[serde(skip)]
    inner: blake3::Hash,
}

impl ExamLayoutHash {
    pub fn of(questions: &[Question]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(questions.len() as u64).to_le_bytes());
        for question in questions {
            hasher.update(&question.id.get().to_le_bytes());
            hasher.update(&(question.option_count() as u64).to_le_bytes());
        }
        Self {
            inner: hasher.finalize(),
        }
    }

    pub fn to_hex(self) -> String {
        self.inner.to_hex().to_string()
    }

    pub fn from_hex(s: &str) -> Fallible<Self> {
        let inner = blake3::Hash::from_hex(s)
            .map_err(|_| ErrorReport::new(format!("invalid layout hash: {s}")))?;
        Ok(Self { inner })
    }
}

impl Display for ExamLayoutHash {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for ExamLayoutHash {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ExamLayoutHash::from_hex(&value)
    }
}

impl From<ExamLayoutHash> for String {
    fn from(hash: ExamLayoutHash) -> String {
        hash.to_hex()
    }
}
