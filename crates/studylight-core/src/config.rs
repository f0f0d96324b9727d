// Copyright 2025 The studylight Authors
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

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;

/// Application configuration, usually read from `studylight.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub narration: NarrationConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the serverless functions, without a trailing slash.
    pub base_url: String,
    /// Sent as a bearer token and as the `apikey` header, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321/functions/v1".to_string(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrationConfig {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    /// How long to wait after mounting before announcing the page.
    pub announce_delay_ms: u64,
}

impl NarrationConfig {
    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
            announce_delay_ms: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub profile_key: String,
    pub history_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            profile_key: "studylight_profile".to_string(),
            history_key: "studylight_history".to_string(),
        }
    }
}
