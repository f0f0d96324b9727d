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
use studylight_core::catalog::content::ContentItem;
use studylight_core::catalog::video;
use studylight_core::catalog::video::VideoLesson;
use studylight_core::error::Fallible;
use studylight_core::types::profile::LearningFormat;

pub fn list_content(
    topic: Option<&str>,
    format: Option<LearningFormat>,
    out: &mut impl Write,
) -> Fallible<()> {
    let items: Vec<&ContentItem> = content::all()
        .iter()
        .filter(|item| topic.is_none_or(|t| item.topic.eq_ignore_ascii_case(t)))
        .filter(|item| format.is_none_or(|f| item.format == f))
        .collect();
    if items.is_empty() {
        writeln!(out, "No content found.")?;
        return Ok(());
    }
    for item in items {
        writeln!(
            out,
            "[{}] {} ({}, {}, {}, {} min)",
            item.id,
            item.title,
            item.topic,
            item.format.label(),
            item.difficulty.label(),
            item.duration
        )?;
        writeln!(out, "    {}", item.description)?;
    }
    Ok(())
}

pub fn list_videos(subject: Option<&str>, query: Option<&str>, out: &mut impl Write) -> Fallible<()> {
    let videos: Vec<&VideoLesson> = video::search(query.unwrap_or(""))
        .into_iter()
        .filter(|v| subject.is_none_or(|s| v.subject.eq_ignore_ascii_case(s)))
        .collect();
    if videos.is_empty() {
        writeln!(out, "No videos found.")?;
        return Ok(());
    }
    for v in videos {
        writeln!(
            out,
            "[{}] {} ({}, {}, {})",
            v.id, v.title, v.subject, v.level, v.duration
        )?;
        writeln!(out, "    {}", v.embed_url())?;
    }
    Ok(())
}
