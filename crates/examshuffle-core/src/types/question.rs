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

use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::answer::AnswerInput;
use crate::answer::AnswerValue;
use crate::answer::LETTER_COUNT;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::index::CanonicalIndex;

/// Keys under which an answer key may be stored. None of these may ever
/// reach a student.
pub const ANSWER_KEY_FIELDS: [&str; 4] = [
    "correctAnswer",
    "correctAnswers",
    "correct_answer",
    "correct_answers",
];

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for QuestionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question as stored: options in canonical order plus the answer key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub prompt: String,
    /// `None` for question types without options (free text, etc).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(
        default,
        alias = "correct_answer",
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_answer: Option<AnswerInput>,
    #[serde(
        default,
        alias = "correct_answers",
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_answers: Option<Vec<AnswerValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    /// Anything else the question carries (type, explanation, media). Passed
    /// through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    pub fn option_count(&self) -> usize {
        self.options.as_ref().map_or(0, Vec::len)
    }

    pub fn points(&self) -> f64 {
        self.points.unwrap_or(1.0)
    }

    pub fn has_answer_key(&self) -> bool {
        self.correct_answer.is_some() || self.correct_answers.is_some()
    }

    /// Every value in the answer key, from both fields.
    pub fn answer_key_values(&self) -> Vec<&AnswerValue> {
        let mut values: Vec<&AnswerValue> = Vec::new();
        if let Some(answer) = &self.correct_answer {
            values.extend(answer.values());
        }
        if let Some(answers) = &self.correct_answers {
            values.extend(answers);
        }
        values
    }

    /// Whether any answer-key value is written as a letter rather than a
    /// number or numeric string.
    pub fn key_uses_letters(&self) -> bool {
        self.answer_key_values().into_iter().any(|v| match v {
            AnswerValue::Text(s) => !v.is_blank() && s.trim().parse::<usize>().is_err(),
            AnswerValue::Index(_) => false,
        })
    }

    /// A letter answer key on more options than there are letters cannot be
    /// rewritten into every presented position.
    pub fn letter_key_overflows(&self) -> bool {
        self.option_count() > LETTER_COUNT && self.key_uses_letters()
    }

    /// The answer key as canonical indices. Fails if any value is
    /// unparseable or outside `[0, option_count)`.
    pub fn canonical_answer_key(&self) -> Fallible<BTreeSet<CanonicalIndex>> {
        let count = self.option_count();
        let mut key = BTreeSet::new();
        for value in self.answer_key_values() {
            if value.is_blank() {
                continue;
            }
            let index = value.to_index()?;
            if index >= count {
                return fail(format!(
                    "question {}: answer key index {index} is out of range for {count} options",
                    self.id
                ));
            }
            key.insert(CanonicalIndex::new(index));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "id": 1,
        "prompt": "Capital of France?",
        "options": ["Paris", "London", "Rome", "Berlin"],
        "correctAnswer": "A",
        "type": "multiple_choice",
        "explanation": "It's Paris."
    }"#;

    #[test]
    fn test_deserialize() -> Fallible<()> {
        let q: Question = serde_json::from_str(JSON)?;
        assert_eq!(q.id, QuestionId::new(1));
        assert_eq!(q.option_count(), 4);
        assert_eq!(
            q.correct_answer,
            Some(AnswerInput::One(AnswerValue::Text("A".to_string())))
        );
        assert_eq!(q.extra.get("type"), Some(&Value::from("multiple_choice")));
        assert!(!q.extra.contains_key("correctAnswer"));
        assert_eq!(q.points(), 1.0);
        Ok(())
    }

    #[test]
    fn test_snake_case_answer_key_is_captured() -> Fallible<()> {
        let q: Question = serde_json::from_str(
            r#"{"id": 2, "options": ["x", "y"], "correct_answers": ["B"]}"#,
        )?;
        assert!(q.has_answer_key());
        for field in ANSWER_KEY_FIELDS {
            assert!(!q.extra.contains_key(field));
        }
        Ok(())
    }

    #[test]
    fn test_canonical_answer_key() -> Fallible<()> {
        let q: Question = serde_json::from_str(
            r#"{"id": 3, "options": ["a", "b", "c"], "correctAnswer": ["A", "2"], "correctAnswers": [0]}"#,
        )?;
        let key: Vec<usize> = q.canonical_answer_key()?.into_iter().map(|k| k.get()).collect();
        assert_eq!(key, vec![0, 2]);
        Ok(())
    }

    #[test]
    fn test_letter_key_overflow() -> Fallible<()> {
        let options: Vec<String> = (0..30).map(|i| format!("\"o{i}\"")).collect();
        let json = format!(
            r#"{{"id": 5, "options": [{}], "correctAnswer": "b"}}"#,
            options.join(",")
        );
        let q: Question = serde_json::from_str(&json)?;
        assert!(q.key_uses_letters());
        assert!(q.letter_key_overflows());

        let q: Question = serde_json::from_str(&json.replace("\"b\"", "\"1\""))?;
        assert!(!q.key_uses_letters());
        assert!(!q.letter_key_overflows());

        let q: Question = serde_json::from_str(JSON)?;
        assert!(q.key_uses_letters());
        assert!(!q.letter_key_overflows());
        Ok(())
    }

    #[test]
    fn test_answer_key_out_of_range() -> Fallible<()> {
        let q: Question =
            serde_json::from_str(r#"{"id": 4, "options": ["a", "b"], "correctAnswer": "D"}"#)?;
        assert!(q.canonical_answer_key().is_err());
        Ok(())
    }
}
