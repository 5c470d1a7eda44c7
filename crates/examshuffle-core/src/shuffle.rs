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

use crate::rng::SeededSequence;
use crate::types::permutation::Permutation;

/// The result of shuffling: `shuffled[i] == items[permutation[i]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Shuffled<T> {
    pub shuffled: Vec<T>,
    pub permutation: Permutation,
}

/// Fisher-Yates shuffle that also records where every element came from.
///
/// Draws exactly `n - 1` values from `rng` for `n >= 2` and none otherwise,
/// so the number of draws depends only on the length.
pub fn shuffle_with_permutation<T: Clone>(items: &[T], rng: &mut SeededSequence) -> Shuffled<T> {
    let mut shuffled = items.to_vec();
    let mut indices: Vec<usize> = (0..items.len()).collect();
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        shuffled.swap(i, j);
        indices.swap(i, j);
    }
    Shuffled {
        shuffled,
        permutation: Permutation::from_vec_unchecked(indices),
    }
}
