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

use std::fmt::Debug;
use std::fmt::Formatter;

use crate::error::Fallible;
use crate::error::fail;

/// Length, in hex characters, of a secret fingerprint.
const FINGERPRINT_LEN: usize = 12;

/// The process-wide key used to derive shuffle seeds.
///
/// There is deliberately no default value: a guessable key would let anyone
/// reproduce every student's option order.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSecret {
    bytes: Vec<u8>,
}

impl ServerSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Fallible<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return fail("the server secret must not be empty");
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A short, non-reversible tag identifying this secret. Two processes
    /// with the same fingerprint produce the same permutations.
    pub fn fingerprint(&self) -> String {
        let hash = blake3::derive_key("examshuffle secret fingerprint", &self.bytes);
        let mut hex = hex::encode(hash);
        hex.truncate(FINGERPRINT_LEN);
        hex
    }
}

impl Debug for ServerSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServerSecret({})", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(ServerSecret::new("").is_err());
        assert!(ServerSecret::new(Vec::new()).is_err());
    }

    #[test]
    fn test_debug_does_not_leak() -> Fallible<()> {
        let secret = ServerSecret::new("hunter2")?;
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(&secret.fingerprint()));
        Ok(())
    }

    #[test]
    fn test_fingerprint() -> Fallible<()> {
        let a = ServerSecret::new("alpha")?;
        let b = ServerSecret::new("beta")?;
        assert_eq!(a.fingerprint().len(), FINGERPRINT_LEN);
        assert_eq!(a.fingerprint(), ServerSecret::new("alpha")?.fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        Ok(())
    }
}
