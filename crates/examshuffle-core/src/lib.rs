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

//! examshuffle-core: deterministic, reversible answer-option shuffling.
//!
//! Every (exam, student, attempt) triple gets its own presentation order for
//! each multiple-choice question:
//! - Seeds are derived with HMAC-SHA256 under a server secret
//! - One SHA-256 counter stream per attempt drives Fisher-Yates shuffles
//! - Permutations map presented positions back to canonical indices, so
//!   graded answers always resolve against the stored answer key
//!
//! Nothing is cached or persisted: the same inputs always rebuild the same
//! permutations.

pub mod answer;
pub mod builder;
pub mod error;
pub mod grading;
pub mod rng;
pub mod seed;
pub mod shuffle;
pub mod types;
pub mod view;

// Re-exports for convenience
pub use answer::{AnswerInput, AnswerValue, index_to_letter, letter_to_index};
pub use answer::normalize_answer_to_indices;
pub use builder::{PermutationMapping, build_exam_permutations};
pub use error::{ErrorReport, Fallible, fail};
pub use grading::{GradeReport, QuestionOutcome, Submission, grade_exam, grade_question};
pub use rng::SeededSequence;
pub use seed::derive_seed;
pub use shuffle::{Shuffled, shuffle_with_permutation};
pub use types::context::ShuffleContext;
pub use types::exam::Exam;
pub use types::index::{CanonicalIndex, PresentedIndex};
pub use types::layout_hash::ExamLayoutHash;
pub use types::permutation::{InversePermutation, Permutation};
pub use types::question::{Question, QuestionId};
pub use types::secret::ServerSecret;
pub use types::seed::Seed;
pub use view::{
    GradingExam, GradingQuestion, StudentExam, StudentQuestion, apply_permutation_to_question,
    apply_permutation_with_correct_answers, grading_view, student_view,
};
