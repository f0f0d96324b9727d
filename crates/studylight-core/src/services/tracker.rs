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

use crate::services::ServiceError;

/// Identifies one request issued through a [`RequestTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// What happened to a resolved response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The value replaced the current one.
    Applied,
    /// The request failed. The last good value is kept; the error should be
    /// shown to the user.
    Failed(ServiceError),
    /// A newer response has already been applied, or the view was closed.
    /// Nothing changed.
    Discarded,
}

/// Holds the latest value of a remote resource that a view displays.
///
/// Requests are never cancelled. Each gets a ticket; a response is only
/// applied if no newer one has been applied and the view is still open.
#[derive(Debug)]
pub struct RequestTracker<T> {
    next: u64,
    applied: Option<Ticket>,
    outstanding: usize,
    closed: bool,
    value: Option<T>,
}

impl<T> Default for RequestTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestTracker<T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            applied: None,
            outstanding: 0,
            closed: false,
            value: None,
        }
    }

    /// Start a request.
    pub fn issue(&mut self) -> Ticket {
        let ticket = Ticket(self.next);
        self.next += 1;
        self.outstanding += 1;
        ticket
    }

    pub fn resolve(&mut self, ticket: Ticket, result: Result<T, ServiceError>) -> Resolution {
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.closed || self.applied.is_some_and(|applied| applied > ticket) {
            return Resolution::Discarded;
        }
        match result {
            Ok(value) => {
                self.applied = Some(ticket);
                self.value = Some(value);
                Resolution::Applied
            }
            Err(e) => Resolution::Failed(e),
        }
    }

    /// The view went away. Later responses are discarded.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding > 0 && !self.closed
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_responses() {
        let mut tracker: RequestTracker<&str> = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(tracker.is_loading());
        assert_eq!(tracker.resolve(second, Ok("second")), Resolution::Applied);
        assert_eq!(tracker.resolve(first, Ok("first")), Resolution::Discarded);
        assert_eq!(tracker.value(), Some(&"second"));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_in_order_responses() {
        let mut tracker: RequestTracker<u32> = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert_eq!(tracker.resolve(first, Ok(1)), Resolution::Applied);
        assert_eq!(tracker.resolve(second, Ok(2)), Resolution::Applied);
        assert_eq!(tracker.value(), Some(&2));
    }

    #[test]
    fn test_errors_keep_last_good_value() {
        let mut tracker: RequestTracker<u32> = RequestTracker::new();
        let first = tracker.issue();
        tracker.resolve(first, Ok(7));
        let second = tracker.issue();
        assert_eq!(
            tracker.resolve(second, Err(ServiceError::RateLimited)),
            Resolution::Failed(ServiceError::RateLimited)
        );
        assert_eq!(tracker.value(), Some(&7));
    }

    #[test]
    fn test_closed_view_discards() {
        let mut tracker: RequestTracker<u32> = RequestTracker::new();
        let ticket = tracker.issue();
        tracker.close();
        assert!(!tracker.is_loading());
        assert_eq!(tracker.resolve(ticket, Ok(1)), Resolution::Discarded);
        assert_eq!(tracker.value(), None);
    }
}
