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

//! Browser front end: mounts the accessibility layer into the page and
//! exposes the profile and the remote services to the page scripts.

mod dom;
mod keyboard;
mod logger;
mod speech;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;
use std::rc::Weak;
use std::str::FromStr;

use js_sys::Promise;
use log::LevelFilter;
use studylight_core::accessibility::AccessibilityCoordinator;
use studylight_core::accessibility::PendingAnnouncement;
use studylight_core::accessibility::Platform;
use studylight_core::catalog::content;
use studylight_core::config::Config;
use studylight_core::document::Notifier;
use studylight_core::document::Toast;
use studylight_core::error::ErrorReport;
use studylight_core::narration::SpeechSynthesizer;
use studylight_core::onboarding::INTRO;
use studylight_core::onboarding::Questionnaire;
use studylight_core::onboarding::Response;
use studylight_core::services::ServiceError;
use studylight_core::services::contract::ChatReply;
use studylight_core::services::contract::Conversation;
use studylight_core::services::contract::PerformanceAnalysis;
use studylight_core::services::contract::QuestionsRequest;
use studylight_core::services::contract::Quiz;
use studylight_core::services::contract::Recommendation;
use studylight_core::services::gateway::GatewayClient;
use studylight_core::services::tracker::RequestTracker;
use studylight_core::services::tracker::Resolution;
use studylight_core::services::tracker::Ticket;
use studylight_core::shortcuts::Disposition;
use studylight_core::storage::KeyValueStorage;
use studylight_core::storage::MemoryStorage;
use studylight_core::types::activity::Activity;
use studylight_core::types::activity::CompletedActivity;
use studylight_core::types::profile::FontSize;
use studylight_core::types::profile::ProfileUpdate;
use studylight_core::types::profile::SessionProfile;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use wasm_bindgen_futures::spawn_local;
use web_sys::EventTarget;
use web_sys::KeyboardEvent;
use web_sys::Window;

use crate::dom::DomRoot;
use crate::dom::DomToasts;
use crate::keyboard::KeyListener;
use crate::keyboard::key_press;
use crate::speech::FinishedCallback;
use crate::speech::WebSpeech;
use crate::storage::LocalStorage;

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_failure(value: JsValue) -> ErrorReport {
    ErrorReport::new(describe(&value))
}

fn report(e: ErrorReport) -> JsError {
    JsError::new(e.message())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

struct Inner {
    window: Window,
    coordinator: RefCell<AccessibilityCoordinator>,
    gateway: GatewayClient,
    notifier: RefCell<DomToasts>,
    listener: RefCell<Option<KeyListener>>,
    recommendation: RefCell<RequestTracker<Recommendation>>,
    quiz: RefCell<RequestTracker<Quiz>>,
    analysis: RefCell<RequestTracker<PerformanceAnalysis>>,
    reply: RefCell<RequestTracker<ChatReply>>,
    conversation: RefCell<Conversation>,
    onboarding: RefCell<Option<Questionnaire>>,
}

impl Inner {
    fn snapshot(&self) -> (SessionProfile, Vec<Activity>) {
        let coordinator = self.coordinator.borrow();
        let settings = coordinator.settings();
        (settings.profile().clone(), settings.history().to_vec())
    }

    /// Apply a response to its view, toasting failures.
    fn settle<T: serde::Serialize>(
        &self,
        tracker: &RefCell<RequestTracker<T>>,
        ticket: Ticket,
        result: Result<T, ServiceError>,
    ) -> Result<JsValue, JsValue> {
        let resolution = tracker.borrow_mut().resolve(ticket, result);
        self.present(tracker, resolution)
    }

    fn present<T: serde::Serialize>(
        &self,
        tracker: &RefCell<RequestTracker<T>>,
        resolution: Resolution,
    ) -> Result<JsValue, JsValue> {
        match resolution {
            Resolution::Applied => {
                let tracker = tracker.borrow();
                let json = serde_json::to_string(&tracker.value())
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                Ok(JsValue::from_str(&json))
            }
            Resolution::Failed(e) => {
                let message = e.user_message();
                self.notifier.borrow_mut().notify(Toast::error(message.clone()));
                Err(JsValue::from_str(&message))
            }
            Resolution::Discarded => Ok(JsValue::NULL),
        }
    }

    /// Remote views start over on every mount.
    fn open_views(&self) {
        *self.recommendation.borrow_mut() = RequestTracker::new();
        *self.quiz.borrow_mut() = RequestTracker::new();
        *self.analysis.borrow_mut() = RequestTracker::new();
        *self.reply.borrow_mut() = RequestTracker::new();
    }

    fn close_views(&self) {
        self.recommendation.borrow_mut().close();
        self.quiz.borrow_mut().close();
        self.analysis.borrow_mut().close();
        self.reply.borrow_mut().close();
    }
}

/// The accessibility layer and session state of one page.
#[wasm_bindgen]
pub struct App {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl App {
    /// Create the app. `config` is the text of a `studylight.toml`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<App, JsError> {
        logger::init(LevelFilter::Info);
        let config = match config {
            Some(text) => Config::from_toml(&text).map_err(report)?,
            None => Config::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let storage: Box<dyn KeyValueStorage> = match LocalStorage::open(&window) {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("Local storage unavailable; preferences will not be saved.");
                Box::new(MemoryStorage::new())
            }
        };
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let on_finished: FinishedCallback = Rc::new(move |id| {
                let weak = weak.clone();
                // Deferred, since the platform may report completion while
                // the coordinator is still borrowed.
                spawn_local(async move {
                    if let Some(inner) = weak.upgrade() {
                        if let Ok(mut coordinator) = inner.coordinator.try_borrow_mut() {
                            coordinator.utterance_finished(id);
                        }
                    }
                });
            });
            let speech = WebSpeech::open(&window, on_finished)
                .map(|speech| Box::new(speech) as Box<dyn SpeechSynthesizer>);
            let platform = Platform {
                storage,
                speech,
                document: Box::new(DomRoot::new(document.clone())),
                notifier: Box::new(DomToasts::new(window.clone(), document.clone())),
            };
            Inner {
                window: window.clone(),
                coordinator: RefCell::new(AccessibilityCoordinator::new(platform, &config)),
                gateway: GatewayClient::new(&config.gateway),
                notifier: RefCell::new(DomToasts::new(window.clone(), document.clone())),
                listener: RefCell::new(None),
                recommendation: RefCell::new(RequestTracker::new()),
                quiz: RefCell::new(RequestTracker::new()),
                analysis: RefCell::new(RequestTracker::new()),
                reply: RefCell::new(RequestTracker::new()),
                conversation: RefCell::new(Conversation::new()),
                onboarding: RefCell::new(None),
            }
        });
        Ok(App { inner })
    }

    /// Attach the global shortcuts and apply the stored settings to the page.
    pub fn mount(&self) -> Result<(), JsError> {
        let pending = self.inner.coordinator.borrow_mut().mount().map_err(report)?;
        if self.inner.listener.borrow().is_none() {
            let weak = Rc::downgrade(&self.inner);
            let target: EventTarget = self.inner.window.clone().into();
            let listener = KeyListener::attach(target, move |event: KeyboardEvent| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let press = key_press(&event);
                let disposition = match inner.coordinator.try_borrow_mut() {
                    Ok(mut coordinator) => coordinator.handle_key(&press),
                    Err(_) => {
                        log::warn!("Dropped key press during an update.");
                        return;
                    }
                };
                if disposition == Disposition::Handled {
                    event.prevent_default();
                }
            })
            .map_err(|e| JsError::new(&describe(&e)))?;
            *self.inner.listener.borrow_mut() = Some(listener);
        }
        self.inner.open_views();
        if let Some(pending) = pending {
            self.schedule_announcement(pending)?;
        }
        Ok(())
    }

    /// Detach the shortcuts, stop narration, and ignore responses still in
    /// flight.
    pub fn unmount(&self) {
        self.inner.coordinator.borrow_mut().unmount();
        self.inner.listener.borrow_mut().take();
        self.inner.close_views();
    }

    #[wasm_bindgen(js_name = toggleNarration)]
    pub fn toggle_narration(&self) -> bool {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .toggle_narration()
    }

    #[wasm_bindgen(js_name = toggleHighContrast)]
    pub fn toggle_high_contrast(&self) -> bool {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .toggle_high_contrast()
    }

    #[wasm_bindgen(js_name = toggleKeyboardOnly)]
    pub fn toggle_keyboard_only(&self) -> bool {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .toggle_keyboard_only()
    }

    #[wasm_bindgen(js_name = cycleFontSize)]
    pub fn cycle_font_size(&self) -> String {
        let size = self
            .inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .cycle_font_size();
        size.to_string()
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&self, size: &str) -> Result<(), JsError> {
        let size = FontSize::from_str(size).map_err(report)?;
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .set_font_size(size);
        Ok(())
    }

    pub fn speak(&self, text: &str) {
        self.inner.coordinator.borrow_mut().settings_mut().speak(text);
    }

    pub fn stop(&self) {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .stop_narration();
    }

    #[wasm_bindgen(js_name = readPage)]
    pub fn read_page(&self) {
        self.inner.coordinator.borrow_mut().settings_mut().read_page();
    }

    /// Describe a hovered, focused or clicked control, if narration is on.
    pub fn narrate(&self, text: &str) {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .narrate_interaction(text);
    }

    #[wasm_bindgen(js_name = isSpeaking)]
    pub fn is_speaking(&self) -> bool {
        self.inner.coordinator.borrow().settings().is_speaking()
    }

    /// The profile, as JSON.
    pub fn profile(&self) -> Result<String, JsError> {
        to_json(self.inner.coordinator.borrow().profile())
    }

    /// Merge a partial profile, given as JSON.
    #[wasm_bindgen(js_name = updateProfile)]
    pub fn update_profile(&self, update: &str) -> Result<(), JsError> {
        let update: ProfileUpdate =
            serde_json::from_str(update).map_err(|e| JsError::new(&e.to_string()))?;
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .update_profile(update)
            .map_err(report)
    }

    #[wasm_bindgen(js_name = resetProfile)]
    pub fn reset_profile(&self) -> Result<(), JsError> {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .reset_profile()
            .map_err(report)
    }

    /// The activity history, newest first, as JSON.
    pub fn history(&self) -> Result<String, JsError> {
        to_json(&self.inner.coordinator.borrow().settings().history())
    }

    /// Record a completed activity, given as JSON. Returns the stored entry.
    #[wasm_bindgen(js_name = completeActivity)]
    pub fn complete_activity(&self, activity: &str) -> Result<String, JsError> {
        let activity: CompletedActivity =
            serde_json::from_str(activity).map_err(|e| JsError::new(&e.to_string()))?;
        let created = self
            .inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .add_activity(activity)
            .map_err(report)?;
        to_json(&created)
    }

    /// Record a finished library lesson. Returns the stored entry as JSON.
    /// Failures are also shown as a toast.
    #[wasm_bindgen(js_name = completeLesson)]
    pub fn complete_lesson(
        &self,
        content_id: &str,
        score: u8,
        minutes: u32,
    ) -> Result<String, JsError> {
        let created = self
            .inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .complete_lesson(content_id, score, minutes)
            .map_err(report)?;
        to_json(&created)
    }

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&self) -> Result<(), JsError> {
        self.inner
            .coordinator
            .borrow_mut()
            .settings_mut()
            .clear_history()
            .map_err(report)
    }

    /// Begin the onboarding questionnaire and narrate its introduction.
    #[wasm_bindgen(js_name = startOnboarding)]
    pub fn start_onboarding(&self) {
        *self.inner.onboarding.borrow_mut() = Some(Questionnaire::new());
        let mut coordinator = self.inner.coordinator.borrow_mut();
        let settings = coordinator.settings_mut();
        settings.narrate_interaction(&format!(
            "{INTRO} {}",
            Questionnaire::new().step().prompt()
        ));
    }

    /// Feed a key to the questionnaire. Returns the phrase describing what
    /// happened, or nothing if the key was ignored.
    #[wasm_bindgen(js_name = onboardingKey)]
    pub fn onboarding_key(&self, key: &str) -> Result<Option<String>, JsError> {
        let response = match self.inner.onboarding.borrow_mut().as_mut() {
            Some(questionnaire) => questionnaire.handle_key(key),
            None => return Ok(None),
        };
        let mut coordinator = self.inner.coordinator.borrow_mut();
        let settings = coordinator.settings_mut();
        let phrase = match response {
            Response::Selected(phrase) => phrase,
            Response::Moved(step) => step.prompt().to_string(),
            Response::Completed(update) => {
                self.inner.onboarding.borrow_mut().take();
                settings.update_profile(update).map_err(report)?;
                "Profile set up successfully!".to_string()
            }
            Response::Ignored => return Ok(None),
        };
        settings.narrate_interaction(&phrase);
        Ok(Some(phrase))
    }

    /// Fetch a recommendation. Resolves to JSON, or to `null` when a newer
    /// response has already been shown.
    pub fn recommend(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let (profile, history) = inner.snapshot();
            let ticket = inner.recommendation.borrow_mut().issue();
            let result = inner.gateway.recommend(&profile, &history).await;
            inner.settle(&inner.recommendation, ticket, result)
        })
    }

    /// Fetch a quiz for a library item.
    #[wasm_bindgen(js_name = generateQuestions)]
    pub fn generate_questions(&self, content_id: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let Some(item) = content::by_id(&content_id) else {
                return Err(JsValue::from_str(&format!("No content with id {content_id}.")));
            };
            let request = QuestionsRequest {
                topic: item.topic.to_string(),
                difficulty: item.difficulty,
                title: item.title.to_string(),
            };
            let ticket = inner.quiz.borrow_mut().issue();
            let result = inner.gateway.generate_questions(&request).await;
            inner.settle(&inner.quiz, ticket, result)
        })
    }

    pub fn analyze(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let (profile, history) = inner.snapshot();
            let ticket = inner.analysis.borrow_mut().issue();
            let result = inner.gateway.analyze(&profile, &history).await;
            inner.settle(&inner.analysis, ticket, result)
        })
    }

    /// Send a message to the tutor.
    pub fn chat(&self, message: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let (profile, _) = inner.snapshot();
            let request = inner.conversation.borrow().request(&message, &profile);
            let ticket = inner.reply.borrow_mut().issue();
            let result = inner.gateway.chat(&request).await;
            let resolution = inner.conversation.borrow_mut().resolve_reply(
                &message,
                &mut inner.reply.borrow_mut(),
                ticket,
                result,
            );
            inner.present(&inner.reply, resolution)
        })
    }

    /// The tutor transcript so far, as JSON.
    pub fn transcript(&self) -> Result<String, JsError> {
        to_json(&self.inner.conversation.borrow().messages())
    }
}

impl App {
    fn schedule_announcement(&self, pending: PendingAnnouncement) -> Result<(), JsError> {
        let weak = Rc::downgrade(&self.inner);
        let announce = Closure::once_into_js(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut coordinator) = inner.coordinator.try_borrow_mut() {
                    coordinator.announce_page(pending);
                }
            }
        });
        let millis = i32::try_from(pending.delay().as_millis()).unwrap_or(i32::MAX);
        self.inner
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                announce.unchecked_ref(),
                millis,
            )
            .map_err(|e| JsError::new(&describe(&e)))?;
        Ok(())
    }
}
