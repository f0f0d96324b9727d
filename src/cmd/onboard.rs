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

use std::io::BufRead;
use std::io::Write;

use studylight_core::error::Fallible;
use studylight_core::onboarding::INTRO;
use studylight_core::onboarding::Questionnaire;
use studylight_core::onboarding::Response;
use studylight_core::types::profile::ProfileUpdate;

const HELP: &str = "Type a number to choose, press Enter to continue, `b` to go back, `q` to quit.";

/// Map a typed line to the key the questionnaire understands.
fn key_for(line: &str) -> &str {
    match line.trim() {
        "" => "Enter",
        "b" | "back" => "ArrowLeft",
        other => other,
    }
}

/// Run the questionnaire over lines of input. Returns `None` if the user
/// quits or the input ends before the last step.
pub fn run_questionnaire(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<Option<ProfileUpdate>> {
    let mut questionnaire = Questionnaire::new();
    writeln!(out, "{INTRO}")?;
    writeln!(out, "{HELP}")?;
    writeln!(out)?;
    writeln!(out, "{}", questionnaire.step().prompt())?;
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let key = key_for(&line);
        if key == "q" || key == "quit" {
            return Ok(None);
        }
        match questionnaire.handle_key(key) {
            Response::Selected(phrase) => writeln!(out, "{phrase}")?,
            Response::Moved(step) => {
                writeln!(out)?;
                writeln!(out, "{}", step.prompt())?;
            }
            Response::Completed(update) => return Ok(Some(update)),
            Response::Ignored => writeln!(out, "{HELP}")?,
        }
    }
}
