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

use axum::extract::Path;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use studylight_core::catalog::content;
use studylight_core::catalog::content::ContentItem;
use studylight_core::catalog::video;
use studylight_core::catalog::video::VideoLesson;

use crate::markdown::markdown_to_html;
use crate::serve::template::page_template;

type Page = (StatusCode, Html<String>);

fn render(title: &str, body: Markup) -> Page {
    (StatusCode::OK, Html(page_template(title, body).into_string()))
}

pub fn not_found_page() -> Page {
    let body = html! {
        h1 { "Not Found" }
        p { "There is nothing at this address. " a href="/" { "Back to the library." } }
    };
    (
        StatusCode::NOT_FOUND,
        Html(page_template("Not Found", body).into_string()),
    )
}

fn query_link(base: &str, key: &str, value: &str) -> String {
    format!("{base}?{key}={}", utf8_percent_encode(value, NON_ALPHANUMERIC))
}

#[derive(Deserialize)]
pub struct LibraryQuery {
    topic: Option<String>,
}

pub async fn library(Query(query): Query<LibraryQuery>) -> Page {
    let topic = query.topic.filter(|t| !t.is_empty());
    let items: Vec<&ContentItem> = match &topic {
        Some(topic) => content::by_topic(topic),
        None => content::all().iter().collect(),
    };
    let body = html! {
        h1 { "Content Library" }
        p { "Lessons adapted to how you learn. Press Alt H to hear the keyboard shortcuts." }
        nav.filters aria-label="Topics" {
            a href="/" aria-current=[topic.is_none().then_some("page")] { "All" }
            @for t in content::topics() {
                a href=(query_link("/", "topic", t)) aria-current=[(topic.as_deref() == Some(t)).then_some("page")] { (t) }
            }
        }
        @if items.is_empty() {
            p { "No content found." }
        } @else {
            ul.cards {
                @for item in &items {
                    li.card {
                        h2 { a href={ "/content/" (item.id) } { (item.title) } }
                        p { (item.description) }
                        p.meta {
                            (item.topic) " · " (item.format.label()) " · " (item.difficulty.label()) " · " (item.duration) " min"
                        }
                    }
                }
            }
        }
        section #recommendation aria-live="polite" {
            button type="button" data-action="recommend" { "Recommend something for me" }
        }
    };
    render("Library", body)
}

pub async fn content_page(Path(id): Path<String>) -> Page {
    let Some(item) = content::by_id(&id) else {
        return not_found_page();
    };
    let body = html! {
        article {
            h1 { (item.title) }
            p.meta {
                (item.topic) " · " (item.format.label()) " · " (item.difficulty.label()) " · " (item.duration) " min"
            }
            div.rich-text {
                (PreEscaped(markdown_to_html(item.body)))
            }
            ul.tags aria-label="Tags" {
                @for tag in item.tags {
                    li { (tag) }
                }
            }
            button type="button" data-action="complete" data-content-id=(item.id) { "Mark as completed" }
        }
    };
    render(item.title, body)
}

#[derive(Deserialize)]
pub struct VideoQuery {
    subject: Option<String>,
    q: Option<String>,
}

pub async fn videos(Query(query): Query<VideoQuery>) -> Page {
    let subject = query.subject.filter(|s| !s.is_empty());
    let search = query.q.unwrap_or_default();
    let lessons: Vec<&VideoLesson> = video::search(&search)
        .into_iter()
        .filter(|v| subject.as_deref().is_none_or(|s| v.subject == s))
        .collect();
    let body = html! {
        h1 { "Video Lessons" }
        form.search method="get" action="/videos" role="search" {
            label for="q" { "Search videos" }
            input #q type="search" name="q" value=(search);
            @if let Some(subject) = &subject {
                input type="hidden" name="subject" value=(subject);
            }
            button type="submit" { "Search" }
        }
        nav.filters aria-label="Subjects" {
            a href="/videos" aria-current=[subject.is_none().then_some("page")] { "All" }
            @for s in video::subjects() {
                a href=(query_link("/videos", "subject", s)) aria-current=[(subject.as_deref() == Some(s)).then_some("page")] { (s) }
            }
        }
        @if lessons.is_empty() {
            p { "No videos found." }
        } @else {
            ul.cards {
                @for v in &lessons {
                    li.card {
                        h2 { a href={ "/videos/" (v.id) } { (v.title) } }
                        p { (v.description) }
                        p.meta { (v.subject) " · " (v.level) " · " (v.duration) }
                    }
                }
            }
        }
    };
    render("Videos", body)
}

pub async fn video_page(Path(id): Path<String>) -> Page {
    let Some(v) = video::by_id(&id) else {
        return not_found_page();
    };
    let body = html! {
        article {
            h1 { (v.title) }
            p.meta { (v.subject) " · " (v.level) " · " (v.duration) }
            div.player {
                iframe src=(v.embed_url()) title=(v.title) allowfullscreen {}
            }
            p { (v.description) }
            ul.tags aria-label="Tags" {
                @for tag in v.tags {
                    li { (tag) }
                }
            }
        }
    };
    render(v.title, body)
}
