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

use studylight_core::document::DocumentRoot;
use studylight_core::document::Notifier;
use studylight_core::document::Toast;
use studylight_core::document::ToastLevel;
use studylight_core::types::profile::FontSize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Document;
use web_sys::Element;
use web_sys::Window;

use crate::describe;

const HEADING_SELECTOR: &str = "main h1, main h2";

const READABLE_SELECTOR: &str =
    "main h1, main h2, main h3, main h4, main h5, main h6, main p";

/// How long a toast stays on screen.
const TOAST_MILLIS: i32 = 3000;

/// The live page.
pub struct DomRoot {
    document: Document,
}

impl DomRoot {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }
}

impl DocumentRoot for DomRoot {
    fn set_high_contrast(&mut self, enabled: bool) {
        if let Some(root) = self.root() {
            if let Err(e) = root
                .class_list()
                .toggle_with_force("high-contrast", enabled)
            {
                log::warn!("Failed to toggle high contrast: {}", describe(&e));
            }
        }
    }

    fn set_font_size(&mut self, size: FontSize) {
        if let Some(root) = self.root() {
            if let Err(e) = root.set_attribute("data-font-size", size.as_str()) {
                log::warn!("Failed to set font size: {}", describe(&e));
            }
        }
    }

    fn first_heading(&self) -> Option<String> {
        let heading = self.document.query_selector(HEADING_SELECTOR).ok()??;
        heading.text_content()
    }

    fn readable_blocks(&self) -> Vec<String> {
        let Ok(nodes) = self.document.query_selector_all(READABLE_SELECTOR) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.text_content())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// Toasts rendered as live-region elements at the end of the body.
pub struct DomToasts {
    window: Window,
    document: Document,
}

impl DomToasts {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn show(&self, toast: &Toast) -> Option<()> {
        let body = self.document.body()?;
        let element = self.document.create_element("div").ok()?;
        let class = match toast.level {
            ToastLevel::Info => "toast toast-info",
            ToastLevel::Error => "toast toast-error",
        };
        element.set_class_name(class);
        element.set_attribute("role", "status").ok()?;
        element.set_attribute("aria-live", "polite").ok()?;
        element.set_text_content(Some(&toast.message));
        body.append_child(&element).ok()?;
        let remove = Closure::once_into_js(move || element.remove());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                remove.unchecked_ref(),
                TOAST_MILLIS,
            )
            .ok()?;
        Some(())
    }
}

impl Notifier for DomToasts {
    fn notify(&mut self, toast: Toast) {
        if self.show(&toast).is_none() {
            log::info!("{}", toast.message);
        }
    }
}
