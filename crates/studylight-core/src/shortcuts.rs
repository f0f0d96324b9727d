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

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// A key-down event, reduced to what shortcut matching needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// The key name as reported by the platform, e.g. `"1"`, `"h"`, `"Escape"`.
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn combination(&self) -> Combination {
        Combination {
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
            key: normalize_key(&self.key),
        }
    }
}

/// A normalized shortcut: modifiers in the fixed order Ctrl, Alt, Shift, then
/// the key. Displays as e.g. `Ctrl+Shift+K`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Combination {
    ctrl: bool,
    alt: bool,
    shift: bool,
    key: String,
}

impl Combination {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Single letters are compared case-insensitively, since holding Alt or Shift
/// changes the case the platform reports.
fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => c.to_uppercase().collect(),
        _ => key.to_string(),
    }
}

impl Display for Combination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for Combination {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A trailing "++" means the key itself is "+".
        let (modifiers, key) = if s == "+" {
            ("", "+")
        } else if let Some(prefix) = s.strip_suffix("++") {
            (prefix, "+")
        } else {
            match s.rsplit_once('+') {
                Some((prefix, key)) => (prefix, key),
                None => ("", s),
            }
        };
        if key.is_empty() {
            return fail(format!("Invalid shortcut '{s}': missing key"));
        }
        let mut combination = Combination {
            ctrl: false,
            alt: false,
            shift: false,
            key: normalize_key(key),
        };
        for modifier in modifiers.split('+').filter(|m| !m.is_empty()) {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => combination.ctrl = true,
                "alt" => combination.alt = true,
                "shift" => combination.shift = true,
                _ => return fail(format!("Invalid shortcut '{s}': unknown modifier '{modifier}'")),
            }
        }
        Ok(combination)
    }
}

/// Identifies one registration, for [`ShortcutDispatcher::unregister`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

/// A shortcut handler. It receives the dispatcher's context so it always acts
/// on current state.
pub type Handler<C> = Box<dyn FnMut(&mut C) -> Fallible<()>>;

/// What the platform should do with the key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// A handler ran; suppress the default behaviour.
    Handled,
    /// No binding; let the event through.
    PassThrough,
}

struct Binding<C> {
    id: BindingId,
    handler: Handler<C>,
}

/// Maps key combinations to handlers. One handler per combination; the latest
/// registration wins.
pub struct ShortcutDispatcher<C> {
    bindings: HashMap<Combination, Binding<C>>,
    next_id: u64,
}

impl<C: 'static> Default for ShortcutDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> ShortcutDispatcher<C> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            next_id: 0,
        }
    }

    /// Bind `combination` (e.g. `"Alt+1"`) to `handler`, replacing any
    /// previous binding for it.
    pub fn register(
        &mut self,
        combination: &str,
        handler: impl FnMut(&mut C) -> Fallible<()> + 'static,
    ) -> Fallible<BindingId> {
        let combination: Combination = combination.parse()?;
        let id = BindingId(self.next_id);
        self.next_id += 1;
        if self.bindings.contains_key(&combination) {
            log::debug!("Replacing binding for {combination}");
        }
        self.bindings.insert(
            combination,
            Binding {
                id,
                handler: Box::new(handler),
            },
        );
        Ok(id)
    }

    /// Register several bindings at once. Stops at the first invalid
    /// combination; bindings before it stay registered.
    pub fn register_all<I>(&mut self, bindings: I) -> Fallible<Vec<BindingId>>
    where
        I: IntoIterator<Item = (&'static str, Handler<C>)>,
    {
        let mut ids = Vec::new();
        for (combination, handler) in bindings {
            ids.push(self.register(combination, handler)?);
        }
        Ok(ids)
    }

    /// Remove a binding. Does nothing if a later registration has already
    /// replaced it.
    pub fn unregister(&mut self, id: BindingId) {
        self.bindings.retain(|_, binding| binding.id != id);
    }

    pub fn is_bound(&self, combination: &str) -> bool {
        match combination.parse::<Combination>() {
            Ok(c) => self.bindings.contains_key(&c),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Run the handler bound to the key press, if any. Handler errors are
    /// logged and never propagate.
    pub fn dispatch(&mut self, press: &KeyPress, context: &mut C) -> Disposition {
        let combination = press.combination();
        match self.bindings.get_mut(&combination) {
            Some(binding) => {
                log::debug!("Shortcut {combination}");
                if let Err(e) = (binding.handler)(context) {
                    log::error!("Shortcut {combination} failed: {e}");
                }
                Disposition::Handled
            }
            None => Disposition::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_from_key_press() {
        let press = KeyPress::new("k").with_shift().with_ctrl();
        assert_eq!(press.combination().to_string(), "Ctrl+Shift+K");
        assert_eq!(KeyPress::new("Escape").combination().to_string(), "Escape");
        assert_eq!(KeyPress::new("1").with_alt().combination().to_string(), "Alt+1");
    }

    #[test]
    fn test_parse_normalizes_order_and_case() -> Fallible<()> {
        let a: Combination = "Shift+Ctrl+k".parse()?;
        let b: Combination = "Ctrl+Shift+K".parse()?;
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Ctrl+Shift+K");
        let h: Combination = "Alt+h".parse()?;
        assert_eq!(h, KeyPress::new("H").with_alt().combination());
        Ok(())
    }

    #[test]
    fn test_parse_plus_key() -> Fallible<()> {
        let c: Combination = "Ctrl++".parse()?;
        assert_eq!(c.key(), "+");
        assert_eq!(c.to_string(), "Ctrl++");
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!("Alt+".parse::<Combination>().is_err());
        assert!("Meta+1".parse::<Combination>().is_err());
        assert!("".parse::<Combination>().is_err());
    }

    #[test]
    fn test_latest_registration_wins() -> Fallible<()> {
        let mut dispatcher: ShortcutDispatcher<Vec<u32>> = ShortcutDispatcher::new();
        for n in 1..=3 {
            dispatcher.register("Alt+3", move |calls: &mut Vec<u32>| {
                calls.push(n);
                Ok(())
            })?;
        }
        let mut calls = Vec::new();
        let outcome = dispatcher.dispatch(&KeyPress::new("3").with_alt(), &mut calls);
        assert_eq!(outcome, Disposition::Handled);
        assert_eq!(calls, vec![3]);
        Ok(())
    }

    #[test]
    fn test_unmatched_passes_through() -> Fallible<()> {
        let mut dispatcher: ShortcutDispatcher<u32> = ShortcutDispatcher::new();
        dispatcher.register("Alt+1", |n: &mut u32| {
            *n += 1;
            Ok(())
        })?;
        let mut n = 0;
        assert_eq!(
            dispatcher.dispatch(&KeyPress::new("1"), &mut n),
            Disposition::PassThrough
        );
        // Extra modifiers do not fall back to a narrower binding.
        assert_eq!(
            dispatcher.dispatch(&KeyPress::new("1").with_alt().with_ctrl(), &mut n),
            Disposition::PassThrough
        );
        assert_eq!(n, 0);
        Ok(())
    }

    #[test]
    fn test_handler_errors_do_not_escape() -> Fallible<()> {
        let mut dispatcher: ShortcutDispatcher<u32> = ShortcutDispatcher::new();
        dispatcher.register("Alt+1", |_: &mut u32| fail("boom"))?;
        dispatcher.register("Alt+2", |n: &mut u32| {
            *n += 1;
            Ok(())
        })?;
        let mut n = 0;
        assert_eq!(
            dispatcher.dispatch(&KeyPress::new("1").with_alt(), &mut n),
            Disposition::Handled
        );
        assert_eq!(
            dispatcher.dispatch(&KeyPress::new("2").with_alt(), &mut n),
            Disposition::Handled
        );
        assert_eq!(n, 1);
        Ok(())
    }

    #[test]
    fn test_unregister() -> Fallible<()> {
        let mut dispatcher: ShortcutDispatcher<u32> = ShortcutDispatcher::new();
        let first = dispatcher.register("Escape", |_: &mut u32| Ok(()))?;
        let second = dispatcher.register("Escape", |n: &mut u32| {
            *n = 7;
            Ok(())
        })?;
        // The superseded id no longer owns the binding.
        dispatcher.unregister(first);
        assert!(dispatcher.is_bound("Escape"));
        let mut n = 0;
        dispatcher.dispatch(&KeyPress::new("Escape"), &mut n);
        assert_eq!(n, 7);

        dispatcher.unregister(second);
        assert!(dispatcher.is_empty());
        Ok(())
    }

    #[test]
    fn test_register_all() -> Fallible<()> {
        let mut dispatcher: ShortcutDispatcher<String> = ShortcutDispatcher::new();
        let ids = dispatcher.register_all(vec![
            (
                "Alt+1",
                Box::new(|s: &mut String| {
                    s.push('a');
                    Ok(())
                }) as Handler<String>,
            ),
            (
                "Alt+2",
                Box::new(|s: &mut String| {
                    s.push('b');
                    Ok(())
                }) as Handler<String>,
            ),
        ])?;
        assert_eq!(ids.len(), 2);
        let mut s = String::new();
        dispatcher.dispatch(&KeyPress::new("2").with_alt(), &mut s);
        dispatcher.dispatch(&KeyPress::new("1").with_alt(), &mut s);
        assert_eq!(s, "ba");
        Ok(())
    }

    /// Builds through `Default` and `register_all` for any context type.
    fn escape_only<C: 'static>(handler: Handler<C>) -> Fallible<ShortcutDispatcher<C>> {
        let mut dispatcher = ShortcutDispatcher::default();
        dispatcher.register_all([("Escape", handler)])?;
        Ok(dispatcher)
    }

    #[test]
    fn test_generic_construction() -> Fallible<()> {
        let mut dispatcher = escape_only(Box::new(|n: &mut u32| {
            *n += 1;
            Ok(())
        }))?;
        let mut n = 0;
        assert_eq!(
            dispatcher.dispatch(&KeyPress::new("Escape"), &mut n),
            Disposition::Handled
        );
        assert_eq!(n, 1);
        Ok(())
    }
}
