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

use studylight_core::shortcuts::KeyPress;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::EventTarget;
use web_sys::KeyboardEvent;

/// A `keydown` listener, removed when dropped.
pub struct KeyListener {
    target: EventTarget,
    callback: Closure<dyn FnMut(KeyboardEvent)>,
}

impl KeyListener {
    pub fn attach(
        target: EventTarget,
        handler: impl FnMut(KeyboardEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(KeyboardEvent)>::new(handler);
        target.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())?;
        Ok(Self { target, callback })
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("keydown", self.callback.as_ref().unchecked_ref());
    }
}

/// The key press an event describes. With Alt held, some layouts report a
/// composed character as the key, so digits and letters are taken from the
/// physical key code instead.
pub fn key_press(event: &KeyboardEvent) -> KeyPress {
    let mut key = event.key();
    if event.alt_key() {
        let code = event.code();
        if let Some(physical) = code
            .strip_prefix("Digit")
            .or_else(|| code.strip_prefix("Key"))
        {
            key = physical.to_string();
        }
    }
    KeyPress {
        key,
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
    }
}
