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

use serde::Serialize;

use crate::catalog::distinct;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl Display for VideoLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VideoLevel::Basic => "Basic",
            VideoLevel::Intermediate => "Intermediate",
            VideoLevel::Advanced => "Advanced",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoLesson {
    pub id: &'static str,
    pub title: &'static str,
    pub subject: &'static str,
    pub description: &'static str,
    pub youtube_id: &'static str,
    /// `mm:ss`.
    pub duration: &'static str,
    pub level: VideoLevel,
    pub tags: &'static [&'static str],
}

impl VideoLesson {
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.youtube_id)
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

macro_rules! video {
    ($id:literal, $title:literal, $subject:literal, $description:literal, $youtube:literal, $duration:literal, $level:ident, [$($tag:literal),*]) => {
        VideoLesson {
            id: $id,
            title: $title,
            subject: $subject,
            description: $description,
            youtube_id: $youtube,
            duration: $duration,
            level: VideoLevel::$level,
            tags: &[$($tag),*],
        }
    };
}

const LIBRARY: &[VideoLesson] = &[
    video!("1", "Introduction to Algebra", "Mathematics", "Basic concepts of algebra and equations",
        "NybHckSEQBI", "15:32", Basic, ["algebra", "equations", "basic math"]),
    video!("2", "Geometry: Areas and Perimeters", "Mathematics", "Computing areas and perimeters of plane figures",
        "WO0vRECEvLc", "12:45", Basic, ["geometry", "areas", "perimeters"]),
    video!("3", "Mathematical Functions", "Mathematics", "Understanding functions and graphs",
        "rHLEWRxRGiM", "18:20", Intermediate, ["functions", "graphs", "analysis"]),
    video!("4", "Python for Beginners", "Programming", "First steps with Python",
        "_uQrJ0TkZlc", "25:15", Basic, ["python", "programming", "beginner"]),
    video!("5", "JavaScript Basics", "Programming", "JavaScript fundamentals",
        "Ptbk2af68e8", "30:45", Basic, ["javascript", "web", "programming"]),
    video!("6", "Algorithms and Logic", "Programming", "Data structures and algorithms",
        "8mei6uVttho", "22:10", Intermediate, ["algorithms", "logic", "data structures"]),
    video!("7", "Biology: The Cell", "Science", "Structure and function of cells",
        "URUJD5NEXC8", "14:30", Basic, ["biology", "cell", "life"]),
    video!("8", "Physics: Basic Mechanics", "Science", "Motion and forces",
        "ZM8ECpBuQYE", "16:55", Intermediate, ["physics", "mechanics", "motion"]),
    video!("9", "Chemistry: The Periodic Table", "Science", "Understanding the chemical elements",
        "rz4Dd1I_fX0", "13:40", Basic, ["chemistry", "elements", "periodic table"]),
    video!("10", "History of Brazil: The Discovery", "History", "The arrival of the Portuguese in Brazil",
        "lJfKZHj_BVk", "20:15", Basic, ["brazil", "history", "discovery"]),
    video!("11", "The Second World War", "History", "Main events of the Second World War",
        "1e_dbsVQrk4", "25:30", Intermediate, ["war", "world history", "20th century"]),
    video!("12", "English for Beginners, Part 1", "Languages", "Basic vocabulary and phrases",
        "wDheBVw6Q5w", "18:20", Basic, ["english", "vocabulary", "beginner"]),
    video!("13", "English Conversation", "Languages", "Practising everyday dialogues",
        "LoVW_F8fwHI", "22:45", Intermediate, ["english", "conversation", "practice"]),
    video!("14", "Geography of Brazil", "Geography", "Regions and characteristics of Brazil",
        "qN9Lk8RfZzE", "17:25", Basic, ["geography", "brazil", "regions"]),
    video!("15", "Climate and Environment", "Geography", "Climate change and sustainability",
        "EtW2rrLHs08", "19:50", Intermediate, ["climate", "environment", "sustainability"]),
];

pub fn all() -> &'static [VideoLesson] {
    LIBRARY
}

pub fn by_id(id: &str) -> Option<&'static VideoLesson> {
    LIBRARY.iter().find(|v| v.id == id)
}

pub fn by_subject(subject: &str) -> Vec<&'static VideoLesson> {
    LIBRARY.iter().filter(|v| v.subject == subject).collect()
}

pub fn subjects() -> Vec<&'static str> {
    distinct(LIBRARY.iter().map(|v| v.subject))
}

/// Case-insensitive search over titles, descriptions and tags. A blank
/// query matches everything.
pub fn search(query: &str) -> Vec<&'static VideoLesson> {
    let needle = query.trim().to_lowercase();
    LIBRARY.iter().filter(|v| v.matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subjects() {
        assert_eq!(
            subjects(),
            vec![
                "Mathematics",
                "Programming",
                "Science",
                "History",
                "Languages",
                "Geography"
            ]
        );
        assert_eq!(by_subject("Science").len(), 3);
        assert!(by_subject("Music").is_empty());
    }

    #[test]
    fn test_search() {
        let found: Vec<&str> = search("BRAZIL").iter().map(|v| v.id).collect();
        assert_eq!(found, vec!["10", "14"]);
        assert_eq!(search("periodic").len(), 1);
        assert_eq!(search("  ").len(), all().len());
        assert!(search("quantum").is_empty());
    }

    #[test]
    fn test_by_id() {
        let Some(video) = by_id("4") else {
            panic!("missing video 4");
        };
        assert_eq!(video.level, VideoLevel::Basic);
        assert_eq!(video.embed_url(), "https://www.youtube.com/embed/_uQrJ0TkZlc");
        assert_eq!(VideoLevel::Intermediate.to_string(), "Intermediate");
    }
}
