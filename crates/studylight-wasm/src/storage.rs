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

use studylight_core::error::Fallible;
use studylight_core::storage::KeyValueStorage;
use web_sys::Storage;
use web_sys::Window;

use crate::js_failure;

/// The browser's `localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// `None` when local storage is disabled, e.g. in some private windows.
    pub fn open(window: &Window) -> Option<Self> {
        match window.local_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            _ => None,
        }
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        self.storage.get_item(key).map_err(js_failure)
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        self.storage.set_item(key, value).map_err(js_failure)
    }

    fn remove(&mut self, key: &str) -> Fallible<()> {
        self.storage.remove_item(key).map_err(js_failure)
    }
}
