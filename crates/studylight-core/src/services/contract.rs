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

use serde::Deserialize;
use serde::Serialize;

use crate::services::ServiceError;
use crate::services::tracker::RequestTracker;
use crate::services::tracker::Resolution;
use crate::services::tracker::Ticket;
use crate::types::activity::Activity;
use crate::types::profile::Difficulty;
use crate::types::profile::LearningFormat;
use crate::types::profile::SessionProfile;

/// How many recent activities a recommendation request carries.
pub const RECOMMEND_HISTORY: usize = 5;

/// How many recent activities an analysis request carries.
pub const ANALYZE_HISTORY: usize = 10;

pub const QUIZ_LENGTH: usize = 5;

pub const QUIZ_OPTIONS: usize = 4;

/// Schema checks beyond what deserialization enforces. A response that
/// fails them is treated as malformed.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub session_profile: SessionProfile,
    pub history: Vec<Activity>,
}

impl RecommendRequest {
    pub fn new(profile: &SessionProfile, history: &[Activity]) -> Self {
        Self {
            session_profile: profile.clone(),
            history: history.iter().take(RECOMMEND_HISTORY).cloned().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub format: LearningFormat,
    pub difficulty: Difficulty,
    pub topic: String,
    /// Minutes.
    pub duration: u32,
    pub reason: String,
    pub adaptations: Vec<String>,
}

impl Validate for Recommendation {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("recommendation has no title".to_string());
        }
        if self.topic.trim().is_empty() {
            return Err("recommendation has no topic".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Percentage of `answers` that are correct, rounded. Missing answers
    /// count as wrong.
    pub fn score(&self, answers: &[usize]) -> u8 {
        if self.questions.is_empty() {
            return 0;
        }
        let correct = self
            .questions
            .iter()
            .zip(answers)
            .filter(|(q, a)| q.correct_answer == **a)
            .count();
        (correct as f64 * 100.0 / self.questions.len() as f64).round() as u8
    }
}

impl Validate for Quiz {
    fn validate(&self) -> Result<(), String> {
        if self.questions.len() != QUIZ_LENGTH {
            return Err(format!(
                "expected {QUIZ_LENGTH} questions, got {}",
                self.questions.len()
            ));
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(format!("question {} is empty", i + 1));
            }
            if q.options.len() != QUIZ_OPTIONS {
                return Err(format!(
                    "question {} has {} options, expected {QUIZ_OPTIONS}",
                    i + 1,
                    q.options.len()
                ));
            }
            if q.correct_answer >= QUIZ_OPTIONS {
                return Err(format!(
                    "question {} has answer index {} out of range",
                    i + 1,
                    q.correct_answer
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub history: Vec<Activity>,
    pub session_profile: SessionProfile,
}

impl AnalyzeRequest {
    pub fn new(profile: &SessionProfile, history: &[Activity]) -> Self {
        Self {
            history: history.iter().take(ANALYZE_HISTORY).cloned().collect(),
            session_profile: profile.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAnalysis {
    pub insights: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub overall_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl PerformanceAnalysis {
    /// The analysis shown before there is any history to analyse.
    pub fn placeholder() -> Self {
        Self {
            insights: vec![
                "Keep practicing so we can gather data about your progress!".to_string(),
            ],
            strengths: Vec::new(),
            improvements: Vec::new(),
            overall_score: 0,
            recommendation: None,
        }
    }
}

impl Validate for PerformanceAnalysis {
    fn validate(&self) -> Result<(), String> {
        if self.overall_score > 100 {
            return Err(format!(
                "overall score {} is out of range",
                self.overall_score
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub session_profile: SessionProfile,
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply_text: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

impl Validate for ChatReply {
    fn validate(&self) -> Result<(), String> {
        if self.reply_text.trim().is_empty() {
            return Err("reply is empty".to_string());
        }
        Ok(())
    }
}

pub const CHAT_GREETING: &str = "Hello! I am your virtual tutor. How can I help you today?";

/// A tutoring conversation: the transcript sent along with every message.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// A conversation opened by the tutor's greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: CHAT_GREETING.to_string(),
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The request for `message`, carrying the transcript so far.
    pub fn request(&self, message: &str, profile: &SessionProfile) -> ChatRequest {
        ChatRequest {
            message: message.trim().to_string(),
            session_profile: profile.clone(),
            conversation_history: self.messages.clone(),
        }
    }

    /// Resolve the reply to `message` through `tracker`. The exchange joins
    /// the transcript only if the reply is applied.
    pub fn resolve_reply(
        &mut self,
        message: &str,
        tracker: &mut RequestTracker<ChatReply>,
        ticket: Ticket,
        result: Result<ChatReply, ServiceError>,
    ) -> Resolution {
        let resolution = tracker.resolve(ticket, result);
        if resolution == Resolution::Applied {
            if let Some(reply) = tracker.value() {
                self.record(message, reply);
            }
        }
        resolution
    }

    /// Record an exchange once the reply has arrived.
    pub fn record(&mut self, message: &str, reply: &ChatReply) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: message.trim().to_string(),
        });
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.reply_text.clone(),
        });
    }
}
