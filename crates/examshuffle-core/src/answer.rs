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

//! Conversions between the forms an answer can take on the wire.
//!
//! Answers arrive as letters (`"A"`), numeric strings (`"2"`), or numbers
//! (`2`), alone or in a list. Nothing here knows whether a value is in
//! presented or canonical coordinates; that is the caller's business.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// Number of options addressable by a letter.
pub const LETTER_COUNT: usize = 26;

/// `0 -> 'A'`, `1 -> 'B'`, and so on. `None` past `'Z'`.
pub fn index_to_letter(index: usize) -> Option<char> {
    if index < LETTER_COUNT {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Inverse of [`index_to_letter`]. Case-insensitive.
pub fn letter_to_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some((upper as u8 - b'A') as usize)
    } else {
        None
    }
}

/// A single answer value as stored or submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Index(i64),
    Text(String),
}

/// One answer value, or several for multiple-select questions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerInput {
    One(AnswerValue),
    Many(Vec<AnswerValue>),
}

impl AnswerValue {
    pub fn letter(index: usize) -> Fallible<Self> {
        match index_to_letter(index) {
            Some(c) => Ok(AnswerValue::Text(c.to_string())),
            None => fail(format!("option {index} has no letter")),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Index(_) => false,
            AnswerValue::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn to_index(&self) -> Fallible<usize> {
        match self {
            AnswerValue::Index(i) => match usize::try_from(*i) {
                Ok(i) => Ok(i),
                Err(_) => fail(format!("negative answer index: {i}")),
            },
            AnswerValue::Text(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<usize>() {
                    return Ok(i);
                }
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => match letter_to_index(c) {
                        Some(i) => Ok(i),
                        None => fail(format!("unrecognized answer: {s:?}")),
                    },
                    _ => fail(format!("unrecognized answer: {s:?}")),
                }
            }
        }
    }

    /// The same kind of value (number, numeric string, or letter of the same
    /// case) but pointing at `index`.
    pub fn with_index(&self, index: usize) -> Fallible<Self> {
        match self {
            AnswerValue::Index(_) => match i64::try_from(index) {
                Ok(i) => Ok(AnswerValue::Index(i)),
                Err(_) => fail(format!("answer index too large: {index}")),
            },
            AnswerValue::Text(s) => {
                let s = s.trim();
                if s.parse::<usize>().is_ok() {
                    return Ok(AnswerValue::Text(index.to_string()));
                }
                let letter = AnswerValue::letter(index)?;
                match letter {
                    AnswerValue::Text(l) if s.chars().all(|c| c.is_ascii_lowercase()) => {
                        Ok(AnswerValue::Text(l.to_ascii_lowercase()))
                    }
                    other => Ok(other),
                }
            }
        }
    }
}

impl AnswerInput {
    pub fn values(&self) -> &[AnswerValue] {
        match self {
            AnswerInput::One(v) => std::slice::from_ref(v),
            AnswerInput::Many(vs) => vs,
        }
    }

    /// Apply `f` to every value, keeping the scalar/list shape.
    pub fn try_map(&self, f: impl Fn(&AnswerValue) -> Fallible<AnswerValue>) -> Fallible<Self> {
        Ok(match self {
            AnswerInput::One(v) => AnswerInput::One(f(v)?),
            AnswerInput::Many(vs) => {
                AnswerInput::Many(vs.iter().map(f).collect::<Fallible<Vec<_>>>()?)
            }
        })
    }
}

/// Convert an answer in any accepted form into a sorted, de-duplicated list
/// of indices. Blank values are ignored.
pub fn normalize_answer_to_indices(answer: &AnswerInput) -> Fallible<Vec<usize>> {
    let mut indices = answer
        .values()
        .iter()
        .filter(|v| !v.is_blank())
        .map(AnswerValue::to_index)
        .collect::<Fallible<Vec<usize>>>()?;
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}
