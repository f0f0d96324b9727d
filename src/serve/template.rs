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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;

/// The accessibility toolbar. Each button's `data-action` names the method
/// the page script calls on the wasm app.
fn toolbar() -> Markup {
    html! {
        nav.toolbar aria-label="Accessibility" {
            button type="button" data-action="toggleNarration" title="Shortcut: Alt+1" { "Narration" }
            button type="button" data-action="toggleHighContrast" title="Shortcut: Alt+2" { "High contrast" }
            button type="button" data-action="cycleFontSize" title="Shortcut: Alt+3" { "Font size" }
            button type="button" data-action="toggleKeyboardOnly" title="Shortcut: Alt+4" { "Keyboard only" }
            button type="button" data-action="readPage" { "Read page" }
            button type="button" data-action="stop" title="Shortcut: Escape" { "Stop" }
        }
    }
}

pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - studylight" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                header {
                    a.brand href="/" { "studylight" }
                    nav.site aria-label="Site" {
                        a href="/" { "Library" }
                        a href="/videos" { "Videos" }
                    }
                    (toolbar())
                }
                main {
                    (body)
                }
                script type="module" src="/script.js" {};
            }
        }
    }
}
