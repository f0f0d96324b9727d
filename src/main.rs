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

mod cli;
mod cmd;
mod files;
mod markdown;
mod serve;

use std::process::ExitCode;

use crate::cli::entrypoint;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    match entrypoint().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read_dir;
    use std::fs::read_to_string;
    use std::path::Path;
    use std::path::PathBuf;

    use studylight_core::error::Fallible;

    const HEADER: &str = "// Copyright 2025 The studylight Authors\n//\n// Licensed under the Apache License, Version 2.0";

    fn rust_sources(dir: &Path, found: &mut Vec<PathBuf>) -> Fallible<()> {
        for entry in read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                rust_sources(&path, found)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                found.push(path);
            }
        }
        Ok(())
    }

    #[test]
    fn test_license_headers() -> Fallible<()> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let mut sources = Vec::new();
        rust_sources(&root.join("src"), &mut sources)?;
        rust_sources(&root.join("crates"), &mut sources)?;
        assert!(sources.len() > 40);
        for path in sources {
            let text = read_to_string(&path)?;
            assert!(text.starts_with(HEADER), "bad header in {}", path.display());
        }
        Ok(())
    }
}
