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

use serde::de::DeserializeOwned;

use crate::config::StorageConfig;
use crate::error::Fallible;
use crate::storage::KeyValueStorage;
use crate::types::activity::Activity;
use crate::types::activity::CompletedActivity;
use crate::types::profile::ProfileUpdate;
use crate::types::profile::SessionProfile;
use crate::types::timestamp::Timestamp;

/// The maximum number of activities kept in the history.
pub const HISTORY_LIMIT: usize = 50;

/// Owns the session profile and the activity history, and writes both
/// through to storage on every mutation.
pub struct ProfileStore {
    storage: Box<dyn KeyValueStorage>,
    keys: StorageConfig,
    profile: SessionProfile,
    history: Vec<Activity>,
}

impl ProfileStore {
    /// Load the stored profile and history. Missing or malformed entries fall
    /// back to the defaults, and activities with out-of-range values are
    /// dropped.
    pub fn load(storage: Box<dyn KeyValueStorage>, keys: StorageConfig) -> Self {
        let profile: SessionProfile = read_entry(storage.as_ref(), &keys.profile_key)
            .unwrap_or_default();
        let mut history: Vec<Activity> =
            read_entry(storage.as_ref(), &keys.history_key).unwrap_or_default();
        history.retain(|activity| match activity.validate() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropping stored activity {}: {}", activity.id, e.message());
                false
            }
        });
        history.truncate(HISTORY_LIMIT);
        log::debug!("Loaded profile and {} activities.", history.len());
        Self {
            storage,
            keys,
            profile,
            history,
        }
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    /// Newest first.
    pub fn history(&self) -> &[Activity] {
        &self.history
    }

    /// The `n` most recent activities.
    pub fn recent_history(&self, n: usize) -> &[Activity] {
        &self.history[..n.min(self.history.len())]
    }

    /// Merge `update` into the profile and persist it.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Fallible<()> {
        self.profile.apply(update);
        self.persist_profile()
    }

    /// Record a completed activity with a fresh id and the current time.
    #[cfg(feature = "clock")]
    pub fn add_activity(&mut self, activity: CompletedActivity) -> Fallible<&Activity> {
        self.add_activity_at(activity, Timestamp::now())
    }

    /// Record a completed activity with a fresh id, completed at `at`.
    pub fn add_activity_at(
        &mut self,
        activity: CompletedActivity,
        at: Timestamp,
    ) -> Fallible<&Activity> {
        activity.validate()?;
        let activity = activity.into_activity(at);
        log::debug!("Recording activity {} ({})", activity.id, activity.title);
        self.history.insert(0, activity);
        self.history.truncate(HISTORY_LIMIT);
        self.persist_history()?;
        Ok(&self.history[0])
    }

    pub fn clear_history(&mut self) -> Fallible<()> {
        self.history.clear();
        self.persist_history()
    }

    /// Restore the default profile and clear the history.
    pub fn reset_profile(&mut self) -> Fallible<()> {
        self.profile = SessionProfile::default();
        self.history.clear();
        self.persist_profile()?;
        self.persist_history()
    }

    fn persist_profile(&mut self) -> Fallible<()> {
        let json = serde_json::to_string(&self.profile)?;
        self.storage.set(&self.keys.profile_key, &json)
    }

    fn persist_history(&mut self) -> Fallible<()> {
        let json = serde_json::to_string(&self.history)?;
        self.storage.set(&self.keys.history_key, &json)
    }
}

fn read_entry<T>(storage: &dyn KeyValueStorage, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let text = match storage.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read '{key}' from storage: {e}");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed '{key}' entry: {e}");
            None
        }
    }
}
