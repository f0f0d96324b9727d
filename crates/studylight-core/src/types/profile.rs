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
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// The content modality a student prefers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningFormat {
    #[default]
    Text,
    Audio,
    Video,
    Interactive,
}

impl LearningFormat {
    pub const ALL: [LearningFormat; 4] = [
        LearningFormat::Text,
        LearningFormat::Audio,
        LearningFormat::Video,
        LearningFormat::Interactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningFormat::Text => "text",
            LearningFormat::Audio => "audio",
            LearningFormat::Video => "video",
            LearningFormat::Interactive => "interactive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LearningFormat::Text => "Text",
            LearningFormat::Audio => "Audio",
            LearningFormat::Video => "Video",
            LearningFormat::Interactive => "Interactive",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// The kind of accessibility support a student needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportType {
    Visual,
    Auditory,
    Motor,
    Cognitive,
    Multiple,
}

impl SupportType {
    pub const ALL: [SupportType; 5] = [
        SupportType::Visual,
        SupportType::Auditory,
        SupportType::Motor,
        SupportType::Cognitive,
        SupportType::Multiple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportType::Visual => "visual",
            SupportType::Auditory => "auditory",
            SupportType::Motor => "motor",
            SupportType::Cognitive => "cognitive",
            SupportType::Multiple => "multiple",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupportType::Visual => "Visual",
            SupportType::Auditory => "Auditory",
            SupportType::Motor => "Motor",
            SupportType::Cognitive => "Cognitive",
            SupportType::Multiple => "Multiple",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl FontSize {
    /// Cycling order used by the font size shortcut.
    pub const ALL: [FontSize; 4] = [
        FontSize::Small,
        FontSize::Medium,
        FontSize::Large,
        FontSize::ExtraLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
            FontSize::ExtraLarge => "extra-large",
        }
    }

    /// The next size in the cycle, wrapping from extra-large to small.
    pub fn next(self) -> FontSize {
        let index = FontSize::ALL.iter().position(|s| *s == self).unwrap_or(0);
        FontSize::ALL[(index + 1) % FontSize::ALL.len()]
    }
}

macro_rules! impl_text_enum {
    ($name:ident, $what:literal) => {
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ErrorReport;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim().to_lowercase();
                match $name::ALL.iter().find(|v| v.as_str() == s) {
                    Some(v) => Ok(*v),
                    None => fail(format!("Invalid {}: {}", $what, s)),
                }
            }
        }
    };
}

impl_text_enum!(LearningFormat, "learning format");
impl_text_enum!(Difficulty, "difficulty");
impl_text_enum!(SupportType, "support type");
impl_text_enum!(FontSize, "font size");

/// The persisted learning and accessibility preferences of a student.
///
/// Missing fields in stored JSON take their default value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionProfile {
    pub format: LearningFormat,
    pub difficulty: Difficulty,
    pub needs_support: bool,
    /// Only meaningful when `needs_support` is set. Read it through
    /// [`SessionProfile::support`].
    #[serde(skip_serializing_if = "Option::is_none")]
    support_type: Option<SupportType>,
    pub interests: BTreeSet<String>,
    pub high_contrast: bool,
    pub font_size: FontSize,
    pub tts_enabled: bool,
    pub keyboard_only: bool,
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            format: LearningFormat::Text,
            difficulty: Difficulty::Medium,
            needs_support: false,
            support_type: None,
            interests: BTreeSet::new(),
            high_contrast: false,
            font_size: FontSize::Medium,
            tts_enabled: false,
            keyboard_only: false,
        }
    }
}

impl SessionProfile {
    /// The support type, or `None` when the student does not need support,
    /// regardless of what is stored.
    pub fn support(&self) -> Option<SupportType> {
        if self.needs_support {
            self.support_type
        } else {
            None
        }
    }

    /// Shallow merge: every field present in `update` overwrites the current
    /// value, everything else is kept.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            format,
            difficulty,
            needs_support,
            support_type,
            interests,
            high_contrast,
            font_size,
            tts_enabled,
            keyboard_only,
        } = update;
        if let Some(v) = format {
            self.format = v;
        }
        if let Some(v) = difficulty {
            self.difficulty = v;
        }
        if let Some(v) = needs_support {
            self.needs_support = v;
        }
        if let Some(v) = support_type {
            self.support_type = v;
        }
        if let Some(v) = interests {
            self.interests = v;
        }
        if let Some(v) = high_contrast {
            self.high_contrast = v;
        }
        if let Some(v) = font_size {
            self.font_size = v;
        }
        if let Some(v) = tts_enabled {
            self.tts_enabled = v;
        }
        if let Some(v) = keyboard_only {
            self.keyboard_only = v;
        }
    }
}

/// A partial profile. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<LearningFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_support: Option<bool>,
    /// `Some(None)` clears the stored support type.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_field"
    )]
    pub support_type: Option<Option<SupportType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard_only: Option<bool>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_defaults() {
        let profile = SessionProfile::default();
        assert_eq!(profile.format, LearningFormat::Text);
        assert_eq!(profile.difficulty, Difficulty::Medium);
        assert_eq!(profile.font_size, FontSize::Medium);
        assert!(!profile.needs_support);
        assert!(!profile.tts_enabled);
        assert!(profile.interests.is_empty());
        assert_eq!(profile.support(), None);
    }

    #[test]
    fn test_font_size_cycle() {
        assert_eq!(FontSize::Small.next(), FontSize::Medium);
        assert_eq!(FontSize::Medium.next(), FontSize::Large);
        assert_eq!(FontSize::Large.next(), FontSize::ExtraLarge);
        assert_eq!(FontSize::ExtraLarge.next(), FontSize::Small);
    }

    #[test]
    fn test_apply_is_a_shallow_merge() {
        let mut profile = SessionProfile::default();
        profile.apply(ProfileUpdate {
            format: Some(LearningFormat::Video),
            tts_enabled: Some(true),
            ..Default::default()
        });
        profile.apply(ProfileUpdate {
            format: Some(LearningFormat::Audio),
            font_size: Some(FontSize::Large),
            ..Default::default()
        });
        let mut expected = SessionProfile::default();
        expected.format = LearningFormat::Audio;
        expected.tts_enabled = true;
        expected.font_size = FontSize::Large;
        assert_eq!(profile, expected);
    }

    #[test]
    fn test_support_ignored_without_need() -> Fallible<()> {
        let mut profile = SessionProfile::default();
        profile.apply(ProfileUpdate {
            support_type: Some(Some(SupportType::Motor)),
            ..Default::default()
        });
        assert_eq!(profile.support(), None);

        let json = serde_json::to_string(&profile)?;
        let back: SessionProfile = serde_json::from_str(&json)?;
        assert_eq!(back.support(), None);

        let mut back = back;
        back.apply(ProfileUpdate {
            needs_support: Some(true),
            ..Default::default()
        });
        assert_eq!(back.support(), Some(SupportType::Motor));
        Ok(())
    }

    #[test]
    fn test_stored_json_layout() -> Fallible<()> {
        let mut profile = SessionProfile::default();
        profile.font_size = FontSize::ExtraLarge;
        profile.interests.insert("Mathematics".to_string());
        let value = serde_json::to_value(&profile)?;
        assert_eq!(value["fontSize"], "extra-large");
        assert_eq!(value["format"], "text");
        assert_eq!(value["ttsEnabled"], false);
        assert_eq!(value["interests"][0], "Mathematics");
        assert!(value.get("supportType").is_none());
        Ok(())
    }

    #[test]
    fn test_missing_fields_take_defaults() -> Fallible<()> {
        let profile: SessionProfile = serde_json::from_str(r#"{"format":"video"}"#)?;
        assert_eq!(profile.format, LearningFormat::Video);
        assert_eq!(profile.font_size, FontSize::Medium);
        Ok(())
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() -> Fallible<()> {
        let update: ProfileUpdate = serde_json::from_str(r#"{"supportType":null}"#)?;
        assert_eq!(update.support_type, Some(None));
        let update: ProfileUpdate = serde_json::from_str(r#"{"highContrast":true}"#)?;
        assert_eq!(update.support_type, None);
        assert_eq!(update.high_contrast, Some(true));
        Ok(())
    }

    #[test]
    fn test_from_str() -> Fallible<()> {
        assert_eq!("Extra-Large".parse::<FontSize>()?, FontSize::ExtraLarge);
        assert_eq!("interactive".parse::<LearningFormat>()?, LearningFormat::Interactive);
        assert!("tiny".parse::<FontSize>().is_err());
        Ok(())
    }
}
