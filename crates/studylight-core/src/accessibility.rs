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

use std::time::Duration;

use crate::catalog::content;
use crate::config::Config;
use crate::document::DocumentRoot;
use crate::document::Notifier;
use crate::document::Toast;
use crate::error::Fallible;
use crate::error::fail;
use crate::narration::NarrationEngine;
use crate::narration::SpeechSynthesizer;
use crate::narration::UtteranceId;
use crate::narration::VoiceSettings;
use crate::shortcuts::BindingId;
use crate::shortcuts::Disposition;
use crate::shortcuts::Handler;
use crate::shortcuts::KeyPress;
use crate::shortcuts::ShortcutDispatcher;
use crate::storage::KeyValueStorage;
use crate::store::ProfileStore;
use crate::types::activity::Activity;
use crate::types::activity::CompletedActivity;
use crate::types::profile::FontSize;
use crate::types::profile::ProfileUpdate;
use crate::types::profile::SessionProfile;
use crate::types::timestamp::Timestamp;

pub const HELP_TEXT: &str = "Available shortcuts: \
    Alt + 1: toggle narration. \
    Alt + 2: toggle high contrast. \
    Alt + 3: change font size. \
    Alt + 4: toggle keyboard mode. \
    Escape: stop narration. \
    Alt + H: hear this help.";

pub const NOTHING_TO_READ: &str = "There is no content to read on this page.";

/// Separator between blocks when a whole page is read aloud.
const BLOCK_SEPARATOR: &str = ". ";

/// The platform services the coordinator drives.
pub struct Platform {
    pub storage: Box<dyn KeyValueStorage>,
    /// `None` when the platform has no speech synthesis.
    pub speech: Option<Box<dyn SpeechSynthesizer>>,
    pub document: Box<dyn DocumentRoot>,
    pub notifier: Box<dyn Notifier>,
}

/// A page announcement waiting for its delay to elapse. Pass it back to
/// [`AccessibilityCoordinator::announce_page`] once the delay is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingAnnouncement {
    generation: u64,
    delay: Duration,
}

impl PendingAnnouncement {
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// The profile, narration and page state that shortcut handlers act on.
pub struct Settings {
    store: ProfileStore,
    narrator: NarrationEngine,
    document: Box<dyn DocumentRoot>,
    notifier: Box<dyn Notifier>,
    announce_delay: Duration,
    /// Bumped whenever the user starts or stops narration, and on unmount.
    /// A pending announcement from an older generation is dropped.
    speech_generation: u64,
}

impl Settings {
    pub fn profile(&self) -> &SessionProfile {
        self.store.profile()
    }

    pub fn history(&self) -> &[Activity] {
        self.store.history()
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn is_speaking(&self) -> bool {
        self.narrator.is_speaking()
    }

    pub fn toggle_narration(&mut self) -> bool {
        let enabled = !self.profile().tts_enabled;
        self.change(ProfileUpdate {
            tts_enabled: Some(enabled),
            ..Default::default()
        });
        let message = if enabled {
            "Narration enabled"
        } else {
            "Narration disabled"
        };
        // Spoken in both directions, unlike `confirm`, which stays silent
        // while narration is off.
        self.speak(message);
        self.notifier.notify(Toast::info(message));
        enabled
    }

    pub fn toggle_high_contrast(&mut self) -> bool {
        let enabled = !self.profile().high_contrast;
        self.change(ProfileUpdate {
            high_contrast: Some(enabled),
            ..Default::default()
        });
        self.confirm(if enabled {
            "High contrast enabled"
        } else {
            "High contrast disabled"
        });
        enabled
    }

    /// Advance to the next font size, wrapping from extra-large to small.
    pub fn cycle_font_size(&mut self) -> FontSize {
        let size = self.profile().font_size.next();
        self.set_font_size(size);
        size
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.change(ProfileUpdate {
            font_size: Some(size),
            ..Default::default()
        });
        self.confirm(&format!("Font size: {size}"));
    }

    pub fn toggle_keyboard_only(&mut self) -> bool {
        let enabled = !self.profile().keyboard_only;
        self.change(ProfileUpdate {
            keyboard_only: Some(enabled),
            ..Default::default()
        });
        self.confirm(if enabled {
            "Keyboard mode enabled"
        } else {
            "Keyboard mode disabled"
        });
        enabled
    }

    pub fn speak_help(&mut self) -> Option<UtteranceId> {
        self.speak(HELP_TEXT)
    }

    pub fn stop_narration(&mut self) {
        self.speech_generation += 1;
        self.narrator.stop();
    }

    /// Speak on the user's behalf, replacing anything already playing.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        self.speech_generation += 1;
        self.narrator.speak(text)
    }

    /// Read the headings and paragraphs of the main region as one utterance.
    pub fn read_page(&mut self) -> Option<UtteranceId> {
        let blocks = self.document.readable_blocks();
        if blocks.is_empty() {
            self.speak(NOTHING_TO_READ)
        } else {
            self.speak(&blocks.join(BLOCK_SEPARATOR))
        }
    }

    /// Speak a hover, focus or click description, only when narration is on.
    pub fn narrate_interaction(&mut self, text: &str) -> Option<UtteranceId> {
        if self.profile().tts_enabled {
            self.speak(text)
        } else {
            None
        }
    }

    /// Merge `update` into the profile and apply its visual effects. The
    /// in-memory profile changes even when persisting fails.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Fallible<()> {
        let result = self.store.update_profile(update);
        self.apply_visuals();
        result
    }

    #[cfg(feature = "clock")]
    pub fn add_activity(&mut self, activity: CompletedActivity) -> Fallible<Activity> {
        self.add_activity_at(activity, Timestamp::now())
    }

    pub fn add_activity_at(
        &mut self,
        activity: CompletedActivity,
        at: Timestamp,
    ) -> Fallible<Activity> {
        self.store.add_activity_at(activity, at).cloned()
    }

    pub fn clear_history(&mut self) -> Fallible<()> {
        self.store.clear_history()
    }

    /// Record a finished library lesson. Confirms like a setting change;
    /// failures are toasted as well as returned.
    #[cfg(feature = "clock")]
    pub fn complete_lesson(&mut self, content_id: &str, score: u8, minutes: u32) -> Fallible<Activity> {
        self.complete_lesson_at(content_id, score, minutes, Timestamp::now())
    }

    pub fn complete_lesson_at(
        &mut self,
        content_id: &str,
        score: u8,
        minutes: u32,
        at: Timestamp,
    ) -> Fallible<Activity> {
        let result = match content::by_id(content_id) {
            Some(item) => self.add_activity_at(item.completion(score, minutes), at),
            None => fail(format!("no content with id {content_id}.")),
        };
        match &result {
            Ok(activity) => {
                self.confirm(&format!("Lesson {} marked as completed.", activity.title))
            }
            Err(e) => {
                log::warn!("Failed to record lesson {content_id}: {e}");
                self.notifier
                    .notify(Toast::error("The lesson could not be recorded."));
            }
        }
        result
    }

    /// Restore the default profile, clear the history, and reset the page.
    pub fn reset_profile(&mut self) -> Fallible<()> {
        let result = self.store.reset_profile();
        self.apply_visuals();
        result
    }

    /// Show a toast, and speak it too when narration is on.
    fn confirm(&mut self, message: &str) {
        if self.profile().tts_enabled {
            self.speak(message);
        }
        self.notifier.notify(Toast::info(message));
    }

    fn change(&mut self, update: ProfileUpdate) {
        if let Err(e) = self.update_profile(update) {
            log::warn!("Failed to save preferences: {e}");
            self.notifier
                .notify(Toast::error("Your preferences could not be saved."));
        }
    }

    fn apply_visuals(&mut self) {
        let profile = self.store.profile();
        let (high_contrast, font_size) = (profile.high_contrast, profile.font_size);
        self.document.set_high_contrast(high_contrast);
        self.document.set_font_size(font_size);
    }

    fn page_announcement(&self) -> Option<String> {
        let heading = self.document.first_heading()?;
        let heading = heading.trim();
        if heading.is_empty() {
            return None;
        }
        Some(format!(
            "Page loaded. {heading}. Press Alt H to hear the keyboard shortcuts."
        ))
    }
}

fn binding(combination: &'static str, action: fn(&mut Settings)) -> (&'static str, Handler<Settings>) {
    (
        combination,
        Box::new(move |settings: &mut Settings| {
            action(settings);
            Ok(())
        }),
    )
}

fn default_bindings() -> Vec<(&'static str, Handler<Settings>)> {
    vec![
        binding("Alt+1", |s| {
            s.toggle_narration();
        }),
        binding("Alt+2", |s| {
            s.toggle_high_contrast();
        }),
        binding("Alt+3", |s| {
            s.cycle_font_size();
        }),
        binding("Alt+4", |s| {
            s.toggle_keyboard_only();
        }),
        binding("Escape", Settings::stop_narration),
        binding("Alt+H", |s| {
            s.speak_help();
        }),
    ]
}

/// Owns the accessibility state of a page: the global shortcuts, the
/// profile, narration, and the visual attributes of the document.
pub struct AccessibilityCoordinator {
    shortcuts: ShortcutDispatcher<Settings>,
    bindings: Vec<BindingId>,
    settings: Settings,
    mounted: bool,
}

impl AccessibilityCoordinator {
    pub fn new(platform: Platform, config: &Config) -> Self {
        let store = ProfileStore::load(platform.storage, config.storage.clone());
        let narrator =
            NarrationEngine::new(platform.speech, VoiceSettings::from(&config.narration));
        Self {
            shortcuts: ShortcutDispatcher::new(),
            bindings: Vec::new(),
            settings: Settings {
                store,
                narrator,
                document: platform.document,
                notifier: platform.notifier,
                announce_delay: config.narration.announce_delay(),
                speech_generation: 0,
            },
            mounted: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn profile(&self) -> &SessionProfile {
        self.settings.profile()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Register the global shortcuts and apply the stored visual settings.
    /// When narration is on, returns the page announcement to schedule.
    /// Mounting twice does nothing.
    pub fn mount(&mut self) -> Fallible<Option<PendingAnnouncement>> {
        if self.mounted {
            return Ok(None);
        }
        self.bindings = self.shortcuts.register_all(default_bindings())?;
        self.mounted = true;
        self.settings.apply_visuals();
        log::debug!("Accessibility layer mounted.");
        if !self.settings.profile().tts_enabled {
            return Ok(None);
        }
        Ok(Some(PendingAnnouncement {
            generation: self.settings.speech_generation,
            delay: self.settings.announce_delay,
        }))
    }

    /// Unregister the shortcuts, stop narration, and drop any pending
    /// announcement.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for id in self.bindings.drain(..) {
            self.shortcuts.unregister(id);
        }
        self.settings.stop_narration();
        self.mounted = false;
        log::debug!("Accessibility layer unmounted.");
    }

    /// Route a key press to the shortcuts. The caller suppresses the
    /// platform's default action when this returns `Handled`.
    pub fn handle_key(&mut self, press: &KeyPress) -> Disposition {
        if !self.mounted {
            return Disposition::PassThrough;
        }
        self.shortcuts.dispatch(press, &mut self.settings)
    }

    /// Speak the page announcement, unless the coordinator was unmounted,
    /// narration was turned off, the user has narrated something since
    /// mounting, or the page has no heading.
    pub fn announce_page(&mut self, pending: PendingAnnouncement) -> Option<UtteranceId> {
        let settings = &mut self.settings;
        if !self.mounted
            || pending.generation != settings.speech_generation
            || !settings.profile().tts_enabled
        {
            return None;
        }
        let text = settings.page_announcement()?;
        settings.narrator.speak(&text)
    }

    /// Natural completion of an utterance, reported by the platform.
    pub fn utterance_finished(&mut self, id: UtteranceId) {
        self.settings.narrator.utterance_finished(id);
    }
}
