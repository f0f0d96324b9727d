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
use std::io::Write;
use std::str::FromStr;

use clap::Args;
use studylight_core::error::Fallible;
use studylight_core::store::ProfileStore;
use studylight_core::types::profile::Difficulty;
use studylight_core::types::profile::FontSize;
use studylight_core::types::profile::LearningFormat;
use studylight_core::types::profile::ProfileUpdate;
use studylight_core::types::profile::SupportType;

/// Changes to the profile. Options left out are kept as they are.
#[derive(Args, Debug, Default)]
pub struct ProfileChanges {
    /// Preferred learning format.
    #[arg(long)]
    pub format: Option<LearningFormat>,
    /// Preferred difficulty.
    #[arg(long)]
    pub difficulty: Option<Difficulty>,
    /// Support type, or `none`.
    #[arg(long)]
    pub support: Option<String>,
    /// Comma-separated topics of interest.
    #[arg(long, value_delimiter = ',')]
    pub interests: Option<Vec<String>>,
    /// Narrate confirmations and pages.
    #[arg(long)]
    pub tts: Option<bool>,
    #[arg(long)]
    pub high_contrast: Option<bool>,
    #[arg(long)]
    pub font_size: Option<FontSize>,
    #[arg(long)]
    pub keyboard_only: Option<bool>,
}

impl ProfileChanges {
    pub fn into_update(self) -> Fallible<ProfileUpdate> {
        let (needs_support, support_type) = match self.support.as_deref() {
            None => (None, None),
            Some("none") => (Some(false), Some(None)),
            Some(other) => (Some(true), Some(Some(SupportType::from_str(other)?))),
        };
        Ok(ProfileUpdate {
            format: self.format,
            difficulty: self.difficulty,
            needs_support,
            support_type,
            interests: self.interests.map(|interests| {
                interests
                    .into_iter()
                    .map(|i| i.trim().to_string())
                    .filter(|i| !i.is_empty())
                    .collect::<BTreeSet<_>>()
            }),
            high_contrast: self.high_contrast,
            font_size: self.font_size,
            tts_enabled: self.tts,
            keyboard_only: self.keyboard_only,
        })
    }
}

pub fn show_profile(store: &ProfileStore, out: &mut impl Write) -> Fallible<()> {
    let profile = store.profile();
    writeln!(out, "Format:         {}", profile.format.label())?;
    writeln!(out, "Difficulty:     {}", profile.difficulty.label())?;
    let support = match profile.support() {
        Some(support) => support.label(),
        None => "None",
    };
    writeln!(out, "Support:        {support}")?;
    let interests: Vec<&str> = profile.interests.iter().map(String::as_str).collect();
    if interests.is_empty() {
        writeln!(out, "Interests:      -")?;
    } else {
        writeln!(out, "Interests:      {}", interests.join(", "))?;
    }
    writeln!(out, "Narration:      {}", on_off(profile.tts_enabled))?;
    writeln!(out, "High contrast:  {}", on_off(profile.high_contrast))?;
    writeln!(out, "Font size:      {}", profile.font_size)?;
    writeln!(out, "Keyboard only:  {}", on_off(profile.keyboard_only))?;
    Ok(())
}

pub fn set_profile(store: &mut ProfileStore, changes: ProfileChanges) -> Fallible<()> {
    let update = changes.into_update()?;
    if update == ProfileUpdate::default() {
        println!("Nothing to change.");
        return Ok(());
    }
    store.update_profile(update)?;
    println!("Profile updated.");
    Ok(())
}

pub fn reset_profile(store: &mut ProfileStore) -> Fallible<()> {
    store.reset_profile()?;
    println!("Profile and history reset.");
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use studylight_core::config::StorageConfig;
    use studylight_core::storage::MemoryStorage;

    use super::*;

    fn store() -> ProfileStore {
        ProfileStore::load(Box::new(MemoryStorage::new()), StorageConfig::default())
    }

    #[test]
    fn test_support_none_clears_type() -> Fallible<()> {
        let update = ProfileChanges {
            support: Some("none".to_string()),
            ..Default::default()
        }
        .into_update()?;
        assert_eq!(update.needs_support, Some(false));
        assert_eq!(update.support_type, Some(None));
        Ok(())
    }

    #[test]
    fn test_invalid_support() {
        let changes = ProfileChanges {
            support: Some("telepathic".to_string()),
            ..Default::default()
        };
        assert!(changes.into_update().is_err());
    }

    #[test]
    fn test_set_and_show() -> Fallible<()> {
        let mut store = store();
        set_profile(
            &mut store,
            ProfileChanges {
                support: Some("visual".to_string()),
                interests: Some(vec!["Music".to_string(), " ".to_string()]),
                tts: Some(true),
                font_size: Some(FontSize::ExtraLarge),
                ..Default::default()
            },
        )?;
        let mut out = Vec::new();
        show_profile(&store, &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Support:        Visual"));
        assert!(text.contains("Interests:      Music\n"));
        assert!(text.contains("Narration:      on"));
        assert!(text.contains("Font size:      extra-large"));
        Ok(())
    }
}
