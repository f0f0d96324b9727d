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

use std::fs::create_dir_all;
use std::fs::read_to_string;
use std::fs::remove_file;
use std::fs::rename;
use std::fs::write;
use std::path::Path;
use std::path::PathBuf;

use studylight_core::config::Config;
use studylight_core::error::Fallible;
use studylight_core::error::fail;
use studylight_core::storage::KeyValueStorage;
use studylight_core::store::ProfileStore;

/// Name of the optional configuration file in the data directory.
pub const CONFIG_FILE: &str = "studylight.toml";

/// Key/value storage backed by a directory: one `<key>.json` file per key.
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    fn path(&self, key: &str) -> Fallible<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return fail(format!("invalid storage key: {key:?}"));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let path = self.path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        let path = self.path(key)?;
        create_dir_all(&self.directory)?;
        // Write then rename, so a crash never leaves half a file behind.
        let tmp = path.with_extension("json.tmp");
        write(&tmp, value)?;
        rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Fallible<()> {
        let path = self.path(key)?;
        if path.exists() {
            remove_file(path)?;
        }
        Ok(())
    }
}

/// The directory holding a student's profile, history and configuration.
pub struct DataDirectory {
    path: PathBuf,
}

impl DataDirectory {
    /// Open `directory`, or the current directory if none is given.
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let path: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };
        if !path.exists() {
            return fail("directory does not exist.");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `studylight.toml` if present, else use the defaults.
    pub fn config(&self) -> Fallible<Config> {
        let path = self.path.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}; using defaults.");
            return Ok(Config::default());
        }
        log::debug!("Loading {}", path.display());
        Config::from_toml(&read_to_string(path)?)
    }

    pub fn store(&self, config: &Config) -> ProfileStore {
        let storage = FileStorage::new(self.path.clone());
        ProfileStore::load(Box::new(storage), config.storage.clone())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use studylight_core::types::profile::FontSize;
    use studylight_core::types::profile::ProfileUpdate;

    #[test]
    fn test_file_storage() -> Fallible<()> {
        let dir = tempdir()?;
        let mut storage = FileStorage::new(dir.path().to_path_buf());
        assert_eq!(storage.get("profile")?, None);
        storage.set("profile", "{}")?;
        assert_eq!(storage.get("profile")?, Some("{}".to_string()));
        assert!(dir.path().join("profile.json").exists());
        assert!(!dir.path().join("profile.json.tmp").exists());
        storage.remove("profile")?;
        assert_eq!(storage.get("profile")?, None);
        // Removing twice is fine.
        storage.remove("profile")?;
        Ok(())
    }

    #[test]
    fn test_rejects_path_keys() -> Fallible<()> {
        let dir = tempdir()?;
        let mut storage = FileStorage::new(dir.path().to_path_buf());
        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("").is_err());
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let result = DataDirectory::open(Some("./derpherp".to_string()));
        assert!(result.is_err());
        if let Err(e) = result {
            assert_eq!(e.to_string(), "error: directory does not exist.");
        }
    }

    #[test]
    fn test_config_and_store() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        let data = DataDirectory::open(Some(path.clone()))?;
        assert_eq!(data.config()?, Config::default());

        write(
            dir.path().join(CONFIG_FILE),
            "[storage]\nprofile_key = \"me\"\n",
        )?;
        let config = data.config()?;
        assert_eq!(config.storage.profile_key, "me");

        let mut store = data.store(&config);
        store.update_profile(ProfileUpdate {
            font_size: Some(FontSize::Large),
            ..Default::default()
        })?;
        assert!(dir.path().join("me.json").exists());

        // A fresh store sees what the first one wrote.
        let reopened = DataDirectory::open(Some(path))?.store(&config);
        assert_eq!(reopened.profile().font_size, FontSize::Large);
        Ok(())
    }

    #[test]
    fn test_bad_config() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "[gateway]\nbase = 1\n")?;
        let data = DataDirectory::open(Some(dir.path().display().to_string()))?;
        assert!(data.config().is_err());
        Ok(())
    }
}
