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

mod pages;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::fs::write;
    use std::path::PathBuf;
    use std::time::Duration;

    use reqwest::StatusCode;
    use studylight_core::config::Config;
    use studylight_core::error::ErrorReport;
    use studylight_core::error::Fallible;
    use tempfile::tempdir;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::serve::server::ServeOptions;
    use crate::serve::server::start_server;

    fn options(port: u16, assets: Option<PathBuf>) -> ServeOptions {
        ServeOptions {
            host: "127.0.0.1".to_string(),
            port,
            assets,
            open_browser: false,
        }
    }

    async fn start(assets: Option<PathBuf>) -> Fallible<String> {
        let port = portpicker::pick_unused_port().ok_or_else(|| ErrorReport::new("no free port"))?;
        spawn(async move { start_server(&Config::default(), options(port, assets)).await });
        let bind = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        Ok(format!("http://{bind}"))
    }

    #[tokio::test]
    async fn test_start_server_with_missing_assets() {
        let result = start_server(
            &Config::default(),
            options(0, Some(PathBuf::from("./derpherp"))),
        )
        .await;
        assert!(result.is_err());
        if let Err(err) = result {
            assert_eq!(err.to_string(), "error: assets directory does not exist.");
        }
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let assets = tempdir()?;
        write(assets.path().join("studylight_wasm.js"), "export default 1;")?;
        let base = start(Some(assets.path().to_path_buf())).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // The script carries the configuration.
        let response = reqwest::get(format!("{base}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );
        let script = response.text().await?;
        assert!(script.starts_with("const CONFIG = \""));
        assert!(script.contains("studylight_profile"));
        assert!(script.contains("const HAS_ASSETS = true;"));
        // Lessons are recorded by id, and clicks only narrate when it is on.
        assert!(script.contains("app.completeLesson(button.dataset.contentId"));
        assert!(!script.contains("app.speak("));

        // The wasm bundle.
        let response = reqwest::get(format!("{base}/pkg/studylight_wasm.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );
        assert_eq!(response.text().await?, "export default 1;");
        let response = reqwest::get(format!("{base}/pkg/missing.wasm")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = reqwest::get(format!("{base}/pkg/..%2FCargo.toml")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the not found endpoint.
        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The library, filtered by topic.
        let response = reqwest::get(format!("{base}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("<main>"));
        assert!(html.contains("Introduction to Programming"));
        assert!(html.contains("href=\"/?topic=Mathematics\""));
        let html = reqwest::get(format!("{base}/?topic=Mathematics"))
            .await?
            .text()
            .await?;
        assert!(html.contains("Visual Basic Math"));
        assert!(!html.contains("Introduction to Programming"));

        // A lesson.
        let html = reqwest::get(format!("{base}/content/1")).await?.text().await?;
        assert!(html.contains("<h1>Introduction to Programming</h1>"));
        assert!(html.contains("<h2>Introduction to Programming</h2>"));
        let response = reqwest::get(format!("{base}/content/42")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Videos.
        let html = reqwest::get(format!("{base}/videos?q=python")).await?.text().await?;
        assert!(html.contains("Python for Beginners"));
        assert!(!html.contains("JavaScript Basics"));
        let html = reqwest::get(format!("{base}/videos?subject=Geography"))
            .await?
            .text()
            .await?;
        assert!(html.contains("Climate and Environment"));
        assert!(!html.contains("Python for Beginners"));
        let html = reqwest::get(format!("{base}/videos/4")).await?.text().await?;
        assert!(html.contains("https://www.youtube.com/embed/_uQrJ0TkZlc"));
        Ok(())
    }

    #[tokio::test]
    async fn test_without_assets() -> Fallible<()> {
        let base = start(None).await?;
        let script = reqwest::get(format!("{base}/script.js")).await?.text().await?;
        assert!(script.contains("const HAS_ASSETS = false;"));
        let response = reqwest::get(format!("{base}/pkg/studylight_wasm.js")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
