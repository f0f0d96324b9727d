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

//! Contracts for the remote content services, and the client that calls them.

pub mod contract;
#[cfg(feature = "http")]
pub mod gateway;
pub mod parse;
pub mod tracker;

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use thiserror::Error;

/// The remote functions behind the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Recommend,
    GenerateQuestions,
    AnalyzePerformance,
    Chat,
}

impl Service {
    /// Path segment under the gateway base URL.
    pub fn path(self) -> &'static str {
        match self {
            Service::Recommend => "recommend",
            Service::GenerateQuestions => "generate-questions",
            Service::AnalyzePerformance => "analyze-performance",
            Service::Chat => "chat",
        }
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("rate limited")]
    RateLimited,
    #[error("usage quota exceeded")]
    QuotaExceeded,
    #[error("service returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

impl ServiceError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => ServiceError::RateLimited,
            402 => ServiceError::QuotaExceeded,
            _ => {
                let message = parse::extract_json_object(body)
                    .and_then(|json| serde_json::from_str::<ErrorPayload>(json).ok())
                    .map(|payload| payload.error)
                    .unwrap_or_else(|| "unknown error".to_string());
                ServiceError::Status { status, message }
            }
        }
    }

    /// A sentence suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::RateLimited => "Too many requests. Please wait a moment.".to_string(),
            ServiceError::QuotaExceeded => "Usage limit reached.".to_string(),
            ServiceError::Status { message, .. } => format!("The service failed: {message}"),
            ServiceError::Transport(_) => {
                "Could not reach the service. Check your connection.".to_string()
            }
            ServiceError::Malformed(_) => "The service returned an unexpected response.".to_string(),
            ServiceError::InvalidRequest(message) => message.clone(),
        }
    }
}
