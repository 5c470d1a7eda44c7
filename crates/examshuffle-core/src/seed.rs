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

use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;

use crate::types::context::ShuffleContext;
use crate::types::seed::Seed;

type HmacSha256 = Hmac<Sha256>;

/// Derive the seed for one (exam, student, attempt) triple.
///
/// HMAC-SHA256 keyed by the server secret over `"{exam}:{student}:{attempt}"`.
/// Pure: equal contexts always give equal seeds.
pub fn derive_seed(context: &ShuffleContext) -> Seed {
    let mut mac = HmacSha256::new_from_slice(context.secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(context.preimage().as_bytes());
    let digest = mac.finalize().into_bytes();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Seed::from_bytes(bytes)
}
