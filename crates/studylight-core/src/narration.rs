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

use crate::config::NarrationConfig;
use crate::error::Fallible;

/// Identifies one utterance. Ids increase monotonically per engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(u64);

impl UtteranceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoiceSettings {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::from(&NarrationConfig::default())
    }
}

impl From<&NarrationConfig> for VoiceSettings {
    fn from(config: &NarrationConfig) -> Self {
        Self {
            lang: config.lang.clone(),
            rate: config.rate,
            pitch: config.pitch,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub voice: VoiceSettings,
}

/// A platform speech synthesizer.
///
/// Implementations report natural completion asynchronously by calling
/// [`NarrationEngine::utterance_finished`] with the utterance id.
pub trait SpeechSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Fallible<()>;

    fn cancel(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    Speaking(UtteranceId),
}

/// Speaks one utterance at a time. Starting a new one cancels the current.
pub struct NarrationEngine {
    synth: Option<Box<dyn SpeechSynthesizer>>,
    voice: VoiceSettings,
    next_id: u64,
    state: NarrationState,
}

impl NarrationEngine {
    pub fn new(synth: Option<Box<dyn SpeechSynthesizer>>, voice: VoiceSettings) -> Self {
        if synth.is_none() {
            log::debug!("Speech synthesis unavailable; narration disabled.");
        }
        Self {
            synth,
            voice,
            next_id: 0,
            state: NarrationState::Idle,
        }
    }

    /// An engine with no synthesizer. Every call is a no-op.
    pub fn unavailable() -> Self {
        Self::new(None, VoiceSettings::default())
    }

    pub fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    pub fn state(&self) -> NarrationState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, NarrationState::Speaking(_))
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    /// Cancel whatever is playing and speak `text`. Returns `None` when
    /// nothing was started: blank text, no synthesizer, or a platform error.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let synth = self.synth.as_mut()?;
        if let NarrationState::Speaking(_) = self.state {
            synth.cancel();
            self.state = NarrationState::Idle;
        }
        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        let utterance = Utterance {
            id,
            text: text.to_string(),
            voice: self.voice.clone(),
        };
        match synth.speak(&utterance) {
            Ok(()) => {
                self.state = NarrationState::Speaking(id);
                Some(id)
            }
            Err(e) => {
                log::warn!("Failed to start narration: {e}");
                None
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(synth) = self.synth.as_mut() {
            synth.cancel();
        }
        self.state = NarrationState::Idle;
    }

    /// Natural completion reported by the platform. Completions of
    /// superseded utterances are ignored.
    pub fn utterance_finished(&mut self, id: UtteranceId) {
        if self.state == NarrationState::Speaking(id) {
            self.state = NarrationState::Idle;
        }
    }
}

/// A synthesizer that records what it was asked to do. Clones share the
/// same log.
#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::SpeechSynthesizer;
    use super::Utterance;
    use crate::error::Fallible;
    use crate::error::fail;

    #[derive(Clone, Debug, PartialEq)]
    pub enum SpeechEvent {
        Spoke(String),
        Cancelled,
    }

    #[derive(Clone, Default)]
    pub struct RecordingSynthesizer {
        events: Rc<RefCell<Vec<SpeechEvent>>>,
        broken: bool,
    }

    impl RecordingSynthesizer {
        pub fn new() -> Self {
            Self::default()
        }

        /// A synthesizer whose every `speak` fails.
        pub fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }

        pub fn events(&self) -> Vec<SpeechEvent> {
            self.events.borrow().clone()
        }

        pub fn spoken(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    SpeechEvent::Spoke(text) => Some(text.clone()),
                    SpeechEvent::Cancelled => None,
                })
                .collect()
        }

        pub fn last_spoken(&self) -> Option<String> {
            self.spoken().pop()
        }

        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }

    impl SpeechSynthesizer for RecordingSynthesizer {
        fn speak(&mut self, utterance: &Utterance) -> Fallible<()> {
            if self.broken {
                return fail("speech synthesis failed");
            }
            self.events
                .borrow_mut()
                .push(SpeechEvent::Spoke(utterance.text.clone()));
            Ok(())
        }

        fn cancel(&mut self) {
            self.events.borrow_mut().push(SpeechEvent::Cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSynthesizer;
    use super::testing::SpeechEvent;
    use super::*;

    fn engine() -> (NarrationEngine, RecordingSynthesizer) {
        let synth = RecordingSynthesizer::new();
        let engine = NarrationEngine::new(Some(Box::new(synth.clone())), VoiceSettings::default());
        (engine, synth)
    }

    #[test]
    fn test_speak_replaces_current_utterance() {
        let (mut engine, synth) = engine();
        let a = engine.speak("A");
        let b = engine.speak("B");
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);
        assert_eq!(
            synth.events(),
            vec![
                SpeechEvent::Spoke("A".to_string()),
                SpeechEvent::Cancelled,
                SpeechEvent::Spoke("B".to_string()),
            ]
        );
        assert!(engine.is_speaking());
        assert_eq!(engine.state(), NarrationState::Speaking(b.unwrap()));
    }

    #[test]
    fn test_late_completion_of_cancelled_utterance_is_ignored() {
        let (mut engine, _synth) = engine();
        let a = engine.speak("A").unwrap();
        let b = engine.speak("B").unwrap();
        engine.utterance_finished(a);
        assert!(engine.is_speaking());
        engine.utterance_finished(b);
        assert!(!engine.is_speaking());
    }

    #[test]
    fn test_stop() {
        let (mut engine, synth) = engine();
        engine.speak("Hello");
        engine.stop();
        assert!(!engine.is_speaking());
        assert_eq!(synth.events().last(), Some(&SpeechEvent::Cancelled));
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let (mut engine, synth) = engine();
        assert_eq!(engine.speak("   "), None);
        assert!(synth.events().is_empty());
    }

    #[test]
    fn test_unavailable_is_a_no_op() {
        let mut engine = NarrationEngine::unavailable();
        assert!(!engine.is_available());
        assert_eq!(engine.speak("Hello"), None);
        assert!(!engine.is_speaking());
        engine.stop();
        assert_eq!(engine.state(), NarrationState::Idle);
    }

    #[test]
    fn test_platform_error_leaves_engine_idle() {
        let synth = RecordingSynthesizer::broken();
        let mut engine = NarrationEngine::new(Some(Box::new(synth)), VoiceSettings::default());
        assert_eq!(engine.speak("Hello"), None);
        assert!(!engine.is_speaking());
    }

    #[test]
    fn test_voice_from_config() {
        let config = NarrationConfig {
            lang: "pt-BR".to_string(),
            rate: 0.9,
            ..Default::default()
        };
        let voice = VoiceSettings::from(&config);
        assert_eq!(voice.lang, "pt-BR");
        assert_eq!(voice.rate, 0.9);
        assert_eq!(voice.pitch, 1.0);
    }
}
