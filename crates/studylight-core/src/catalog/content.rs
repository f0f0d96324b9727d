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

use crate::catalog::distinct;
use crate::types::activity::CompletedActivity;
use crate::types::profile::Difficulty;
use crate::types::profile::LearningFormat;

/// A lesson in the content library. The body is Markdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub format: LearningFormat,
    pub difficulty: Difficulty,
    pub topic: &'static str,
    /// Minutes.
    pub duration: u32,
    pub tags: &'static [&'static str],
    pub body: &'static str,
}

impl ContentItem {
    /// The activity recorded when this lesson is finished.
    pub fn completion(&self, score: u8, time_spent: u32) -> CompletedActivity {
        CompletedActivity {
            title: self.title.to_string(),
            topic: self.topic.to_string(),
            format: self.format,
            difficulty: self.difficulty,
            score,
            time_spent,
        }
    }
}

const LIBRARY: &[ContentItem] = &[
    ContentItem {
        id: "1",
        title: "Introduction to Programming",
        description: "Learn the basic concepts of programming in an accessible way",
        format: LearningFormat::Text,
        difficulty: Difficulty::Easy,
        topic: "Technology",
        duration: 15,
        tags: &["programming", "beginner", "logic"],
        body: "# Introduction to Programming

Programming is like giving instructions for a computer to follow. It is a way of solving problems with code.

## Basic Concepts

**Variables**: boxes that hold information.

**Conditionals**: let the code make decisions (if this, then that).

**Loops**: repeat actions many times.

Let's start slowly and build your knowledge step by step!
",
    },
    ContentItem {
        id: "2",
        title: "Visual Basic Math",
        description: "Learn arithmetic through visual examples",
        format: LearningFormat::Interactive,
        difficulty: Difficulty::Easy,
        topic: "Mathematics",
        duration: 20,
        tags: &["mathematics", "visual", "basics"],
        body: "# Visual Basic Math

Interactive content with mathematical visualisations.
",
    },
    ContentItem {
        id: "3",
        title: "History of Brazil",
        description: "Discover the main events of Brazilian history",
        format: LearningFormat::Audio,
        difficulty: Difficulty::Medium,
        topic: "History",
        duration: 25,
        tags: &["history", "brazil", "culture"],
        body: "# History of Brazil

A historical narrative about Brazil.
",
    },
    ContentItem {
        id: "4",
        title: "Science: The Human Body",
        description: "Explore how our body works, simply explained",
        format: LearningFormat::Video,
        difficulty: Difficulty::Medium,
        topic: "Science",
        duration: 18,
        tags: &["science", "biology", "health"],
        body: "# Science: The Human Body

An educational video about human anatomy.
",
    },
    ContentItem {
        id: "5",
        title: "Basic English for Beginners",
        description: "First words and phrases in English",
        format: LearningFormat::Audio,
        difficulty: Difficulty::Easy,
        topic: "Languages",
        duration: 15,
        tags: &["english", "languages", "beginner"],
        body: "# Basic English for Beginners

Basic English vocabulary lessons.
",
    },
];

pub fn all() -> &'static [ContentItem] {
    LIBRARY
}

pub fn by_id(id: &str) -> Option<&'static ContentItem> {
    LIBRARY.iter().find(|c| c.id == id)
}

pub fn by_topic(topic: &str) -> Vec<&'static ContentItem> {
    LIBRARY.iter().filter(|c| c.topic == topic).collect()
}

pub fn by_format(format: LearningFormat) -> Vec<&'static ContentItem> {
    LIBRARY.iter().filter(|c| c.format == format).collect()
}

pub fn topics() -> Vec<&'static str> {
    distinct(LIBRARY.iter().map(|c| c.topic))
}
