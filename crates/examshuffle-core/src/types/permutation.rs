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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::index::CanonicalIndex;
use crate::types::index::PresentedIndex;

/// A bijection from presented positions to canonical indices: entry `i` is
/// the canonical index of the option shown at position `i`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation(Vec<usize>);

/// The inverse bijection: entry `k` is the presented position of canonical
/// option `k`. Only obtainable from a [`Permutation`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(into = "Vec<usize>")]
pub struct InversePermutation(Vec<usize>);

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Self((0..len).collect())
    }

    /// Caller guarantees `indices` is a bijection of `0..len`.
    pub(crate) fn from_vec_unchecked(indices: Vec<usize>) -> Self {
        debug_assert!(is_bijection(&indices));
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &p)| i == p)
    }

    pub fn canonical_of(&self, presented: PresentedIndex) -> Option<CanonicalIndex> {
        self.0.get(presented.get()).copied().map(CanonicalIndex::new)
    }

    pub fn inverse(&self) -> InversePermutation {
        let mut inv = vec![0; self.0.len()];
        for (presented, &canonical) in self.0.iter().enumerate() {
            inv[canonical] = presented;
        }
        InversePermutation(inv)
    }

    /// Reorder canonically-ordered `items` into presented order. `None` if
    /// the lengths differ.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Option<Vec<T>> {
        if items.len() != self.0.len() {
            return None;
        }
        Some(self.0.iter().map(|&k| items[k].clone()).collect())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl InversePermutation {
    pub fn presented_of(&self, canonical: CanonicalIndex) -> Option<PresentedIndex> {
        self.0.get(canonical.get()).copied().map(PresentedIndex::new)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

fn is_bijection(indices: &[usize]) -> bool {
    let mut seen = vec![false; indices.len()];
    for &i in indices {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = ErrorReport;

    fn try_from(value: Vec<usize>) -> Fallible<Self> {
        if !is_bijection(&value) {
            return fail(format!("not a permutation: {value:?}"));
        }
        Ok(Self(value))
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(value: Permutation) -> Self {
        value.0
    }
}

impl From<InversePermutation> for Vec<usize> {
    fn from(value: InversePermutation) -> Self {
        value.0
    }
}
