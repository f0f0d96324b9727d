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

use serde::Serialize;

use crate::types::activity::Activity;

/// Aggregate statistics over an activity history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub activities: usize,
    /// Rounded average score, 0 when there are no activities.
    pub average_score: u8,
    /// Total minutes spent.
    pub total_time: u64,
    /// Per-topic statistics, in order of first appearance in the history.
    pub topics: Vec<TopicStats>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub topic: String,
    pub activities: usize,
    pub average_score: u8,
}

impl ProgressSummary {
    pub fn from_history(history: &[Activity]) -> Self {
        let mut topics: Vec<(String, usize, u32)> = Vec::new();
        for activity in history {
            match topics.iter_mut().find(|(t, _, _)| *t == activity.topic) {
                Some((_, count, total)) => {
                    *count += 1;
                    *total += activity.score as u32;
                }
                None => topics.push((activity.topic.clone(), 1, activity.score as u32)),
            }
        }
        let total_score: u32 = history.iter().map(|a| a.score as u32).sum();
        Self {
            activities: history.len(),
            average_score: average(total_score, history.len()),
            total_time: history.iter().map(|a| u64::from(a.time_spent)).sum(),
            topics: topics
                .into_iter()
                .map(|(topic, count, total)| TopicStats {
                    topic,
                    activities: count,
                    average_score: average(total, count),
                })
                .collect(),
        }
    }
}

fn average(total: u32, count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::activity::CompletedActivity;
    use crate::types::profile::Difficulty;
    use crate::types::profile::LearningFormat;
    use crate::types::timestamp::Timestamp;

    fn activity(topic: &str, score: u8, time_spent: u32) -> Fallible<Activity> {
        let at = Timestamp::parse("2025-05-01T09:00:00Z")?;
        Ok(CompletedActivity {
            title: format!("{topic} lesson"),
            topic: topic.to_string(),
            format: LearningFormat::Text,
            difficulty: Difficulty::Medium,
            score,
            time_spent,
        }
        .into_activity(at))
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(ProgressSummary::from_history(&[]), ProgressSummary::default());
    }

    #[test]
    fn test_total_time_does_not_overflow() -> Fallible<()> {
        let history = vec![
            activity("Science", 50, u32::MAX)?,
            activity("Science", 50, u32::MAX)?,
        ];
        let summary = ProgressSummary::from_history(&history);
        assert_eq!(summary.total_time, 2 * u64::from(u32::MAX));
        Ok(())
    }

    #[test]
    fn test_summary() -> Fallible<()> {
        let history = vec![
            activity("Science", 90, 10)?,
            activity("Mathematics", 65, 15)?,
            activity("Science", 71, 5)?,
        ];
        let summary = ProgressSummary::from_history(&history);
        assert_eq!(summary.activities, 3);
        // (90 + 65 + 71) / 3 = 75.33
        assert_eq!(summary.average_score, 75);
        assert_eq!(summary.total_time, 30);
        assert_eq!(
            summary.topics,
            vec![
                TopicStats {
                    topic: "Science".to_string(),
                    activities: 2,
                    average_score: 81,
                },
                TopicStats {
                    topic: "Mathematics".to_string(),
                    activities: 1,
                    average_score: 65,
                },
            ]
        );
        Ok(())
    }
}
