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

use serde::de::DeserializeOwned;

use crate::services::ServiceError;
use crate::services::contract::Validate;

/// The span from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse and validate a response body. Bodies with text around the JSON
/// object are accepted; anything that does not fit the schema is malformed.
pub fn parse_response<T>(body: &str) -> Result<T, ServiceError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(first) => {
            let json = extract_json_object(body)
                .ok_or_else(|| ServiceError::Malformed(first.to_string()))?;
            serde_json::from_str(json).map_err(|e| ServiceError::Malformed(e.to_string()))?
        }
    };
    value.validate().map_err(ServiceError::Malformed)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::contract::PerformanceAnalysis;
    use crate::services::contract::Quiz;
    use crate::services::contract::Recommendation;
    use crate::types::profile::LearningFormat;

    const RECOMMENDATION: &str = r#"{
        "title": "Fractions with Pictures",
        "format": "interactive",
        "difficulty": "easy",
        "topic": "Mathematics",
        "duration": 20,
        "reason": "You did well with visual content.",
        "adaptations": ["Large images", "Narrated steps"]
    }"#;

    #[test]
    fn test_extract() {
        assert_eq!(extract_json_object("```json\n{\"a\": {}}\n```"), Some("{\"a\": {}}"));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_plain_json() -> Result<(), ServiceError> {
        let r: Recommendation = parse_response(RECOMMENDATION)?;
        assert_eq!(r.format, LearningFormat::Interactive);
        assert_eq!(r.adaptations.len(), 2);
        Ok(())
    }

    #[test]
    fn test_wrapped_json() -> Result<(), ServiceError> {
        let body = format!("Here is my suggestion:\n{RECOMMENDATION}\nEnjoy!");
        let r: Recommendation = parse_response(&body)?;
        assert_eq!(r.duration, 20);
        Ok(())
    }

    #[test]
    fn test_schema_violations_are_malformed() {
        let missing = r#"{"title": "X", "format": "text"}"#;
        assert!(matches!(
            parse_response::<Recommendation>(missing),
            Err(ServiceError::Malformed(_))
        ));

        let bad_enum = RECOMMENDATION.replace("interactive", "hologram");
        assert!(matches!(
            parse_response::<Recommendation>(&bad_enum),
            Err(ServiceError::Malformed(_))
        ));

        let too_few = r#"{"questions": []}"#;
        assert!(matches!(
            parse_response::<Quiz>(too_few),
            Err(ServiceError::Malformed(_))
        ));

        let score = r#"{"insights": [], "strengths": [], "improvements": [], "overallScore": 140}"#;
        assert!(matches!(
            parse_response::<PerformanceAnalysis>(score),
            Err(ServiceError::Malformed(_))
        ));

        assert!(matches!(
            parse_response::<Recommendation>("Sorry, I cannot help with that."),
            Err(ServiceError::Malformed(_))
        ));
    }
}
