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

use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use clap::ValueEnum;
use studylight_core::error::Fallible;
use studylight_core::progress::ProgressSummary;
use studylight_core::types::activity::Activity;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(history: &[Activity], format: StatsFormat, out: &mut impl Write) -> Fallible<()> {
    let summary = ProgressSummary::from_history(history);
    match format {
        StatsFormat::Text => {
            writeln!(out, "Activities completed: {}", summary.activities)?;
            writeln!(out, "Average score:        {}%", summary.average_score)?;
            writeln!(out, "Time spent:           {} min", summary.total_time)?;
            if !summary.topics.is_empty() {
                writeln!(out)?;
                for topic in &summary.topics {
                    writeln!(
                        out,
                        "{}: {} activities, average {}%",
                        topic.topic, topic.activities, topic.average_score
                    )?;
                }
            }
        }
        StatsFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use studylight_core::types::timestamp::Timestamp;

    use super::*;
    use crate::cmd::history::completion;

    fn history() -> Fallible<Vec<Activity>> {
        let at = Timestamp::parse("2025-05-01T09:00:00Z")?;
        Ok(vec![
            completion("2", 80, 20)?.into_activity(at),
            completion("1", 70, 10)?.into_activity(at),
            completion("2", 95, 25)?.into_activity(at),
        ])
    }

    #[test]
    fn test_text() -> Fallible<()> {
        let mut out = Vec::new();
        print_stats(&history()?, StatsFormat::Text, &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Activities completed: 3\n"));
        assert!(text.contains("Average score:        82%\n"));
        assert!(text.contains("Time spent:           55 min\n"));
        assert!(text.contains("Mathematics: 2 activities, average 88%\n"));
        assert!(text.contains("Technology: 1 activities, average 70%\n"));
        Ok(())
    }

    #[test]
    fn test_json() -> Fallible<()> {
        let mut out = Vec::new();
        print_stats(&history()?, StatsFormat::Json, &mut out)?;
        let json: Value = serde_json::from_slice(&out)?;
        assert_eq!(json["activities"], 3);
        assert_eq!(json["totalTime"], 55);
        assert_eq!(json["topics"][0]["topic"], "Mathematics");
        Ok(())
    }

    #[test]
    fn test_empty() -> Fallible<()> {
        let mut out = Vec::new();
        print_stats(&[], StatsFormat::Text, &mut out)?;
        assert_eq!(
            String::from_utf8_lossy(&out),
            "Activities completed: 0\nAverage score:        0%\nTime spent:           0 min\n"
        );
        Ok(())
    }
}
