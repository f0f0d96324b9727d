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

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// A UTC instant, serialized as RFC 3339.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ErrorReport::new(format!("invalid timestamp '{s}': {e}")))?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    /// Whole minutes elapsed from `self` to `later`, never negative.
    pub fn minutes_until(self, later: Timestamp) -> u32 {
        let minutes = (later.0 - self.0).num_seconds().max(0) as f64 / 60.0;
        minutes.round() as u32
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> Fallible<()> {
        let ts = Timestamp::parse("2025-03-01T10:00:00+00:00")?;
        assert_eq!(ts.to_string(), "2025-03-01T10:00:00+00:00");
        Ok(())
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_minutes_until() -> Fallible<()> {
        let start = Timestamp::parse("2025-03-01T10:00:00Z")?;
        let end = Timestamp::parse("2025-03-01T10:12:20Z")?;
        assert_eq!(start.minutes_until(end), 12);
        assert_eq!(end.minutes_until(start), 0);
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> Fallible<()> {
        let ts = Timestamp::parse("2025-03-01T10:00:00Z")?;
        let json = serde_json::to_string(&ts)?;
        assert!(json.starts_with("\"2025-03-01T10:00:00"));
        let back: Timestamp = serde_json::from_str(&json)?;
        assert_eq!(back, ts);
        Ok(())
    }
}
