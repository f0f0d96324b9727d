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

use std::collections::BTreeSet;

use crate::types::profile::Difficulty;
use crate::types::profile::LearningFormat;
use crate::types::profile::ProfileUpdate;
use crate::types::profile::SupportType;

/// The topics a student can pick during onboarding, in key order.
pub const INTERESTS: [&str; 7] = [
    "Technology",
    "Mathematics",
    "Science",
    "History",
    "Languages",
    "Art",
    "Music",
];

pub const INTRO: &str = "Profile setup. You will answer a few questions so we can personalise \
    your learning experience, including your preferred format, difficulty level, \
    accessibility needs and areas of interest.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Format,
    Difficulty,
    Support,
    Interests,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Format => 1,
            Step::Difficulty => 2,
            Step::Support => 3,
            Step::Interests => 4,
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Format => Some(Step::Difficulty),
            Step::Difficulty => Some(Step::Support),
            Step::Support => Some(Step::Interests),
            Step::Interests => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::Format => None,
            Step::Difficulty => Some(Step::Format),
            Step::Support => Some(Step::Difficulty),
            Step::Interests => Some(Step::Support),
        }
    }

    /// The question, as narrated when the step is shown.
    pub fn prompt(self) -> &'static str {
        match self {
            Step::Format => {
                "Question 1 of 4: Learning format. How do you prefer to consume educational \
                 content? Press 1 for Text, 2 for Audio, 3 for Video, or 4 for Interactive."
            }
            Step::Difficulty => {
                "Question 2 of 4: Difficulty level. Which level are you most comfortable \
                 starting at? Press 1 for Easy, 2 for Medium, or 3 for Hard."
            }
            Step::Support => {
                "Question 3 of 4: Accessibility needs. Do you need any special adaptations? \
                 Press 1 for No adaptations, 2 for Visual, 3 for Auditory, 4 for Motor, \
                 5 for Cognitive, or 6 for Multiple."
            }
            Step::Interests => {
                "Question 4 of 4: Areas of interest. Select the topics you would like to \
                 learn. Press 1 for Technology, 2 for Mathematics, 3 for Science, 4 for \
                 History, 5 for Languages, 6 for Art, 7 for Music. Press Enter to continue."
            }
        }
    }
}

/// What a key press did to the questionnaire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// An option was picked; carries the phrase to confirm it with.
    Selected(String),
    /// The questionnaire moved to another step.
    Moved(Step),
    /// Enter on the last step.
    Completed(ProfileUpdate),
    /// The key means nothing on this step.
    Ignored,
}

/// The four-step onboarding questionnaire, driven by key presses: digits
/// pick options, Enter advances, ArrowLeft goes back.
#[derive(Clone, Debug)]
pub struct Questionnaire {
    step: Step,
    format: LearningFormat,
    difficulty: Difficulty,
    needs_support: bool,
    support_type: SupportType,
    interests: Vec<String>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    pub fn new() -> Self {
        Self {
            step: Step::Format,
            format: LearningFormat::Text,
            difficulty: Difficulty::Medium,
            needs_support: false,
            support_type: SupportType::Visual,
            interests: Vec::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn handle_key(&mut self, key: &str) -> Response {
        match key {
            "Enter" => match self.step.next() {
                Some(step) => {
                    self.step = step;
                    Response::Moved(step)
                }
                None => Response::Completed(self.finish()),
            },
            "ArrowLeft" => match self.step.previous() {
                Some(step) => {
                    self.step = step;
                    Response::Moved(step)
                }
                None => Response::Ignored,
            },
            _ => match key.parse::<usize>() {
                Ok(n) if n >= 1 => self.select(n - 1),
                _ => Response::Ignored,
            },
        }
    }

    /// Pick the option at `index` (zero-based) on the current step.
    pub fn select(&mut self, index: usize) -> Response {
        match self.step {
            Step::Format => match LearningFormat::ALL.get(index) {
                Some(format) => {
                    self.format = *format;
                    continue_phrase(format.label())
                }
                None => Response::Ignored,
            },
            Step::Difficulty => match Difficulty::ALL.get(index) {
                Some(difficulty) => {
                    self.difficulty = *difficulty;
                    continue_phrase(difficulty.label())
                }
                None => Response::Ignored,
            },
            Step::Support => {
                if index == 0 {
                    self.needs_support = false;
                    return Response::Selected(
                        "No adaptations needed. Press Enter to continue.".to_string(),
                    );
                }
                match SupportType::ALL.get(index - 1) {
                    Some(support) => {
                        self.needs_support = true;
                        self.support_type = *support;
                        continue_phrase(support.label())
                    }
                    None => Response::Ignored,
                }
            }
            Step::Interests => match INTERESTS.get(index) {
                Some(interest) => {
                    if let Some(pos) = self.interests.iter().position(|i| i == interest) {
                        self.interests.remove(pos);
                        Response::Selected(format!("{interest} deselected"))
                    } else {
                        self.interests.push(interest.to_string());
                        Response::Selected(format!("{interest} selected"))
                    }
                }
                None => Response::Ignored,
            },
        }
    }

    /// The profile update the answers so far amount to.
    pub fn finish(&self) -> ProfileUpdate {
        ProfileUpdate {
            format: Some(self.format),
            difficulty: Some(self.difficulty),
            needs_support: Some(self.needs_support),
            support_type: Some(self.needs_support.then_some(self.support_type)),
            interests: Some(self.interests.iter().cloned().collect::<BTreeSet<_>>()),
            ..Default::default()
        }
    }
}

fn continue_phrase(label: &str) -> Response {
    Response::Selected(format!("{label} selected. Press Enter to continue."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::SessionProfile;

    #[test]
    fn test_full_walkthrough() {
        let mut q = Questionnaire::new();
        assert_eq!(
            q.handle_key("3"),
            Response::Selected("Video selected. Press Enter to continue.".to_string())
        );
        assert_eq!(q.handle_key("Enter"), Response::Moved(Step::Difficulty));
        q.handle_key("1");
        q.handle_key("Enter");
        assert_eq!(
            q.handle_key("4"),
            Response::Selected("Motor selected. Press Enter to continue.".to_string())
        );
        q.handle_key("Enter");
        assert_eq!(q.step(), Step::Interests);
        q.handle_key("2");
        q.handle_key("7");
        let Response::Completed(update) = q.handle_key("Enter") else {
            panic!("expected completion");
        };
        let mut profile = SessionProfile::default();
        profile.apply(update);
        assert_eq!(profile.format, LearningFormat::Video);
        assert_eq!(profile.difficulty, Difficulty::Easy);
        assert_eq!(profile.support(), Some(SupportType::Motor));
        assert!(profile.interests.contains("Mathematics"));
        assert!(profile.interests.contains("Music"));
    }

    #[test]
    fn test_no_support_clears_support_type() {
        let mut q = Questionnaire::new();
        q.handle_key("Enter");
        q.handle_key("Enter");
        q.handle_key("5");
        assert_eq!(
            q.handle_key("1"),
            Response::Selected("No adaptations needed. Press Enter to continue.".to_string())
        );
        let update = q.finish();
        assert_eq!(update.needs_support, Some(false));
        assert_eq!(update.support_type, Some(None));
    }

    #[test]
    fn test_interest_toggles() {
        let mut q = Questionnaire::new();
        for _ in 0..3 {
            q.handle_key("Enter");
        }
        assert_eq!(
            q.handle_key("1"),
            Response::Selected("Technology selected".to_string())
        );
        assert_eq!(
            q.handle_key("1"),
            Response::Selected("Technology deselected".to_string())
        );
        assert!(q.interests().is_empty());
    }

    #[test]
    fn test_out_of_range_keys_are_ignored() {
        let mut q = Questionnaire::new();
        assert_eq!(q.handle_key("5"), Response::Ignored);
        assert_eq!(q.handle_key("0"), Response::Ignored);
        assert_eq!(q.handle_key("a"), Response::Ignored);
        assert_eq!(q.handle_key("ArrowLeft"), Response::Ignored);
        q.handle_key("Enter");
        assert_eq!(q.handle_key("4"), Response::Ignored);
        assert_eq!(q.handle_key("ArrowLeft"), Response::Moved(Step::Format));
    }

    #[test]
    fn test_prompts_name_their_step() {
        for step in [Step::Format, Step::Difficulty, Step::Support, Step::Interests] {
            assert!(
                step.prompt()
                    .starts_with(&format!("Question {} of 4", step.number()))
            );
        }
    }
}
