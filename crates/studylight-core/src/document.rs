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

use crate::types::profile::FontSize;

/// The rendered page, as far as the accessibility layer touches it.
pub trait DocumentRoot {
    /// Toggle the `high-contrast` class on the document root.
    fn set_high_contrast(&mut self, enabled: bool);

    /// Set the `data-font-size` attribute on the document root.
    fn set_font_size(&mut self, size: FontSize);

    /// Text of the first `h1` or `h2` inside the main region.
    fn first_heading(&self) -> Option<String>;

    /// Text of the headings and paragraphs inside the main region, in
    /// document order, with empty blocks skipped.
    fn readable_blocks(&self) -> Vec<String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Shows transient notifications.
pub trait Notifier {
    fn notify(&mut self, toast: Toast);
}

/// A notifier that writes toasts to the log. Used where there is no screen.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, toast: Toast) {
        match toast.level {
            ToastLevel::Info => log::info!("{}", toast.message),
            ToastLevel::Error => log::error!("{}", toast.message),
        }
    }
}
