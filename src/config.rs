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

use std::path::Path;

use examshuffle_core::error::ErrorReport;
use examshuffle_core::error::Fallible;
use examshuffle_core::error::fail;
use examshuffle_core::types::secret::ServerSecret;
use serde::Deserialize;

/// Environment variable read when no config file names a secret.
pub const SECRET_ENV_VAR: &str = "EXAMSHUFFLE_SECRET";

/// On-disk configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// The secret itself.
    secret: Option<String>,
    /// Name of an environment variable holding the secret.
    secret_env: Option<String>,
}

/// Process-wide configuration, read once at startup.
pub struct Config {
    pub secret: ServerSecret,
}

impl Config {
    /// Load the configuration. There is no fallback secret: if none is
    /// found, this fails and the process should exit.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        let file: ConfigFile = match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file does not exist: {}", path.display()));
                }
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text).map_err(|e| {
                    ErrorReport::new(format!("failed to parse {}: {e}", path.display()))
                })?
            }
            None => ConfigFile::default(),
        };
        let config = Self::resolve(file, |name| std::env::var(name).ok())?;
        log::info!("using server secret {}", config.secret.fingerprint());
        Ok(config)
    }

    fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Fallible<Self> {
        let (source, value) = match (file.secret, file.secret_env) {
            (Some(_), Some(_)) => {
                return fail("config sets both `secret` and `secret_env`; pick one");
            }
            (Some(secret), None) => ("config file".to_string(), Some(secret)),
            (None, Some(var)) => {
                let value = env(&var);
                (format!("${var}"), value)
            }
            (None, None) => (format!("${SECRET_ENV_VAR}"), env(SECRET_ENV_VAR)),
        };
        let value = value.unwrap_or_default();
        if value.trim().is_empty() {
            log::error!("no server secret configured (looked in {source})");
            return fail(format!(
                "no server secret configured (looked in {source}); refusing to shuffle with a guessable key"
            ));
        }
        Ok(Config {
            secret: ServerSecret::new(value)?,
        })
    }
}
