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

use std::rc::Rc;

use studylight_core::error::Fallible;
use studylight_core::narration::SpeechSynthesizer;
use studylight_core::narration::Utterance;
use studylight_core::narration::UtteranceId;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::SpeechSynthesis;
use web_sys::SpeechSynthesisUtterance;
use web_sys::Window;

use crate::js_failure;

/// Called with the id of an utterance that played to the end.
pub type FinishedCallback = Rc<dyn Fn(UtteranceId)>;

/// The Web Speech API synthesizer.
pub struct WebSpeech {
    synthesis: SpeechSynthesis,
    on_finished: FinishedCallback,
}

impl WebSpeech {
    pub fn open(window: &Window, on_finished: FinishedCallback) -> Option<Self> {
        let synthesis = window.speech_synthesis().ok()?;
        Some(Self {
            synthesis,
            on_finished,
        })
    }
}

impl SpeechSynthesizer for WebSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Fallible<()> {
        let native = SpeechSynthesisUtterance::new_with_text(&utterance.text).map_err(js_failure)?;
        native.set_lang(&utterance.voice.lang);
        native.set_rate(utterance.voice.rate);
        native.set_pitch(utterance.voice.pitch);
        let on_finished = self.on_finished.clone();
        let id = utterance.id;
        let on_end = Closure::once_into_js(move || on_finished(id));
        native.set_onend(Some(on_end.unchecked_ref()));
        self.synthesis.speak(&native);
        Ok(())
    }

    fn cancel(&mut self) {
        self.synthesis.cancel();
    }
}
