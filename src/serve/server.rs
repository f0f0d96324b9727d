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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use studylight_core::config::Config;
use studylight_core::error::ErrorReport;
use studylight_core::error::Fallible;
use studylight_core::error::fail;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::serve::pages::content_page;
use crate::serve::pages::library;
use crate::serve::pages::not_found_page;
use crate::serve::pages::video_page;
use crate::serve::pages::videos;
use crate::serve::state::ServerState;

pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    /// Directory with the output of `wasm-pack build --target web`.
    pub assets: Option<PathBuf>,
    pub open_browser: bool,
}

pub async fn start_server(config: &Config, options: ServeOptions) -> Fallible<()> {
    let assets = match options.assets {
        Some(dir) => {
            if !dir.is_dir() {
                return fail("assets directory does not exist.");
            }
            Some(Arc::new(dir))
        }
        None => {
            log::debug!("No assets directory; pages will work without the accessibility layer.");
            None
        }
    };
    let config_toml = toml::to_string(config).map_err(|e| ErrorReport::new(e.to_string()))?;
    let state = ServerState {
        assets,
        config_toml: config_toml.into(),
    };

    let app = Router::new();
    let app = app.route("/", get(library));
    let app = app.route("/content/{id}", get(content_page));
    let app = app.route("/videos", get(videos));
    let app = app.route("/videos/{id}", get(video_page));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.route("/pkg/{file}", get(asset));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", options.host, options.port);

    if options.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn script(State(state): State<ServerState>) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let mut content = String::new();
    // A JSON string is a valid JavaScript string literal.
    let config = serde_json::to_string(&*state.config_toml).unwrap_or_else(|_| "null".to_string());
    content.push_str(&format!("const CONFIG = {config};\n"));
    content.push_str(&format!("const HAS_ASSETS = {};\n\n", state.assets.is_some()));
    content.push_str(include_str!("script.js"));
    (StatusCode::OK, [(CONTENT_TYPE, "text/javascript")], content)
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

fn content_type(file: &str) -> &'static str {
    match file.rsplit_once('.').map(|(_, ext)| ext) {
        Some("js") => "text/javascript",
        Some("wasm") => "application/wasm",
        Some("json") => "application/json",
        Some("ts") => "text/plain",
        _ => "application/octet-stream",
    }
}

async fn asset(
    State(state): State<ServerState>,
    Path(file): Path<String>,
) -> (StatusCode, [(HeaderName, &'static str); 2], Vec<u8>) {
    let not_found = (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, "text/plain"), (CACHE_CONTROL, "no-cache")],
        b"Not Found".to_vec(),
    );
    let Some(assets) = &state.assets else {
        return not_found;
    };
    let safe = !file.is_empty() && !file.starts_with('.') && !file.contains(['/', '\\']);
    if !safe {
        return not_found;
    }
    match tokio::fs::read(assets.join(&file)).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(CONTENT_TYPE, content_type(&file)), (CACHE_CONTROL, "no-cache")],
            bytes,
        ),
        Err(e) => {
            log::debug!("Asset {file}: {e}");
            not_found
        }
    }
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    not_found_page()
}
