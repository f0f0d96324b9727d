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
use uuid::Uuid;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::profile::Difficulty;
use crate::types::profile::LearningFormat;
use crate::types::timestamp::Timestamp;

/// The highest score an activity can record.
pub const MAX_SCORE: u8 = 100;

/// A completed learning activity, as stored in the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub format: LearningFormat,
    pub difficulty: Difficulty,
    /// Percentage of correct answers, 0 to 100.
    pub score: u8,
    /// Minutes spent on the activity.
    pub time_spent: u32,
    pub completed_at: Timestamp,
}

/// An activity about to be recorded: everything but the id and the
/// completion time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedActivity {
    pub title: String,
    pub topic: String,
    pub format: LearningFormat,
    pub difficulty: Difficulty,
    pub score: u8,
    pub time_spent: u32,
}

fn check_score(score: u8) -> Fallible<()> {
    if score > MAX_SCORE {
        return fail(format!("score must be between 0 and 100, got {score}"));
    }
    Ok(())
}

impl Activity {
    /// Check the values of a record read back from storage.
    pub fn validate(&self) -> Fallible<()> {
        check_score(self.score)
    }
}

impl CompletedActivity {
    pub fn validate(&self) -> Fallible<()> {
        check_score(self.score)
    }

    pub fn into_activity(self, completed_at: Timestamp) -> Activity {
        Activity {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            topic: self.topic,
            format: self.format,
            difficulty: self.difficulty,
            score: self.score,
            time_spent: self.time_spent,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(score: u8) -> CompletedActivity {
        CompletedActivity {
            title: "Visual Basic Math".to_string(),
            topic: "Mathematics".to_string(),
            format: LearningFormat::Interactive,
            difficulty: Difficulty::Easy,
            score,
            time_spent: 12,
        }
    }

    #[test]
    fn test_validate_score() {
        assert!(sample(100).validate().is_ok());
        assert!(sample(0).validate().is_ok());
        assert!(sample(101).validate().is_err());
    }

    #[test]
    fn test_ids_are_unique() -> Fallible<()> {
        let at = Timestamp::parse("2025-01-01T00:00:00Z")?;
        let a = sample(50).into_activity(at);
        let b = sample(50).into_activity(at);
        assert_ne!(a.id, b.id);
        assert_eq!(a.completed_at, at);
        Ok(())
    }

    #[test]
    fn test_json_layout() -> Fallible<()> {
        let at = Timestamp::parse("2025-01-01T00:00:00Z")?;
        let activity = sample(80).into_activity(at);
        let value = serde_json::to_value(&activity)?;
        assert_eq!(value["timeSpent"], 12);
        assert_eq!(value["format"], "interactive");
        assert!(value["completedAt"].is_string());
        Ok(())
    }
}
