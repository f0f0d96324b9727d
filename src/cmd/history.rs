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

use std::io::Write;

use studylight_core::catalog::content;
use studylight_core::error::ErrorReport;
use studylight_core::error::Fallible;
use studylight_core::store::ProfileStore;
use studylight_core::types::activity::Activity;
use studylight_core::types::activity::CompletedActivity;

pub fn show_history(history: &[Activity], out: &mut impl Write) -> Fallible<()> {
    if history.is_empty() {
        writeln!(out, "No activities yet.")?;
        return Ok(());
    }
    for activity in history {
        let date = activity.completed_at.into_inner().format("%Y-%m-%d %H:%M");
        writeln!(
            out,
            "{date}  {} ({}, {}, {}) score {}%, {} min",
            activity.title,
            activity.topic,
            activity.format.label(),
            activity.difficulty.label(),
            activity.score,
            activity.time_spent
        )?;
    }
    Ok(())
}

pub fn clear_history(store: &mut ProfileStore) -> Fallible<()> {
    store.clear_history()?;
    println!("History cleared.");
    Ok(())
}

/// The activity for finishing a library item.
pub fn completion(content_id: &str, score: u8, minutes: u32) -> Fallible<CompletedActivity> {
    let item = content::by_id(content_id)
        .ok_or_else(|| ErrorReport::new(format!("no content with id {content_id}.")))?;
    let activity = item.completion(score, minutes);
    activity.validate()?;
    Ok(activity)
}

pub fn complete(store: &mut ProfileStore, content_id: &str, score: u8, minutes: u32) -> Fallible<()> {
    let activity = store.add_activity(completion(content_id, score, minutes)?)?;
    println!("Recorded \"{}\" with a score of {}%.", activity.title, activity.score);
    Ok(())
}

#[cfg(test)]
mod tests {
    use studylight_core::types::timestamp::Timestamp;

    use super::*;

    #[test]
    fn test_completion() -> Fallible<()> {
        let activity = completion("2", 90, 12)?;
        assert_eq!(activity.topic, "Mathematics");
        assert_eq!(activity.time_spent, 12);
        assert!(completion("99", 90, 12).is_err());
        assert!(completion("2", 101, 12).is_err());
        Ok(())
    }

    #[test]
    fn test_show_history() -> Fallible<()> {
        let mut out = Vec::new();
        show_history(&[], &mut out)?;
        assert_eq!(String::from_utf8_lossy(&out), "No activities yet.\n");

        let activity = completion("1", 75, 15)?.into_activity(Timestamp::parse("2025-05-01T09:30:00Z")?);
        let mut out = Vec::new();
        show_history(&[activity], &mut out)?;
        assert_eq!(
            String::from_utf8_lossy(&out),
            "2025-05-01 09:30  Introduction to Programming (Technology, Text, Easy) score 75%, 15 min\n"
        );
        Ok(())
    }
}
