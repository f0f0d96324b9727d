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

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::services::Service;
use crate::services::ServiceError;
use crate::services::contract::AnalyzeRequest;
use crate::services::contract::ChatReply;
use crate::services::contract::ChatRequest;
use crate::services::contract::PerformanceAnalysis;
use crate::services::contract::QuestionsRequest;
use crate::services::contract::Quiz;
use crate::services::contract::RecommendRequest;
use crate::services::contract::Recommendation;
use crate::services::contract::Validate;
use crate::services::parse::parse_response;
use crate::types::activity::Activity;
use crate::types::profile::SessionProfile;

/// Calls the remote content services over HTTP. No retries.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn recommend(
        &self,
        profile: &SessionProfile,
        history: &[Activity],
    ) -> Result<Recommendation, ServiceError> {
        self.call(Service::Recommend, &RecommendRequest::new(profile, history))
            .await
    }

    pub async fn generate_questions(
        &self,
        request: &QuestionsRequest,
    ) -> Result<Quiz, ServiceError> {
        self.call(Service::GenerateQuestions, request).await
    }

    /// Analyse recent performance. With no history there is nothing to
    /// analyse, and the placeholder is returned without calling out.
    pub async fn analyze(
        &self,
        profile: &SessionProfile,
        history: &[Activity],
    ) -> Result<PerformanceAnalysis, ServiceError> {
        if history.is_empty() {
            return Ok(PerformanceAnalysis::placeholder());
        }
        self.call(Service::AnalyzePerformance, &AnalyzeRequest::new(profile, history))
            .await
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ServiceError> {
        if request.message.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "Type a message first.".to_string(),
            ));
        }
        self.call(Service::Chat, request).await
    }

    async fn call<B, T>(&self, service: Service, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize,
        T: DeserializeOwned + Validate,
    {
        let url = format!("{}/{}", self.base_url, service.path());
        log::debug!("POST {url}");
        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if !status.is_success() {
            let error = ServiceError::from_status(status.as_u16(), &text);
            log::warn!("{service} failed: {error}");
            return Err(error);
        }
        parse_response(&text)
    }
}
