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

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::rng::SeededSequence;
use crate::seed::derive_seed;
use crate::shuffle::shuffle_with_permutation;
use crate::types::context::ShuffleContext;
use crate::types::permutation::Permutation;
use crate::types::question::Question;
use crate::types::question::QuestionId;

/// Per-question permutations for one shuffle context. Questions that are not
/// shuffled (fewer than two options, malformed, or randomization disabled)
/// have no entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PermutationMapping {
    inner: BTreeMap<QuestionId, Permutation>,
}

impl PermutationMapping {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Permutation> {
        self.inner.get(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Permutation)> {
        self.inner.iter()
    }
}

/// Build the permutations for every question of an exam.
///
/// One seed and one random stream serve the whole exam, consumed question by
/// question in list order. A question with `n >= 2` options always consumes
/// `n - 1` draws, even when it is then left out of the mapping because its
/// answer key is broken or cannot be written as letters, so the stream depends only on the context, the
/// question order, and the option counts.
pub fn build_exam_permutations(
    questions: &[Question],
    context: &ShuffleContext,
    randomize: bool,
) -> PermutationMapping {
    if !randomize {
        return PermutationMapping::empty();
    }
    let seed = derive_seed(context);
    let mut rng = SeededSequence::from_seed(&seed);

    let mut seen = HashSet::new();
    let duplicates: HashSet<QuestionId> = questions
        .iter()
        .filter(|q| !seen.insert(q.id))
        .map(|q| q.id)
        .collect();

    let mut inner = BTreeMap::new();
    for question in questions {
        let options = match &question.options {
            Some(options) => options,
            None => {
                if question.has_answer_key() {
                    log::warn!(
                        "exam {}: question {} has an answer key but no options; not shuffled",
                        context.exam_id,
                        question.id
                    );
                }
                continue;
            }
        };
        let key = question.canonical_answer_key();
        if let Err(e) = &key {
            log::warn!("exam {}: {}; not shuffled", context.exam_id, e.message());
        }
        if options.len() < 2 {
            continue;
        }
        let shuffled = shuffle_with_permutation(options, &mut rng);
        if key.is_err() {
            continue;
        }
        if question.letter_key_overflows() {
            log::warn!(
                "exam {}: question {} has {} options but a letter answer key; not shuffled",
                context.exam_id,
                question.id,
                options.len()
            );
            continue;
        }
        if duplicates.contains(&question.id) {
            log::warn!(
                "exam {}: question id {} is not unique; not shuffled",
                context.exam_id,
                question.id
            );
            continue;
        }
        inner.insert(question.id, shuffled.permutation);
    }
    log::debug!(
        "exam {} attempt {}: shuffled {} questions with {} draws",
        context.exam_id,
        context.attempt_number,
        inner.len(),
        rng.draws()
    );
    PermutationMapping { inner }
}
