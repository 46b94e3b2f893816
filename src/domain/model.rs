use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Raw chat-completion output before any parsing.
#[derive(Debug, Clone)]
pub struct RawCompletion {
    pub content: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestKind {
    Positive,
    Negative,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Positive => write!(f, "Positive"),
            TestKind::Negative => write!(f, "Negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// 模型輸出的大小寫不固定，未知值一律視為 Medium。
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Priority::parse_lenient(&raw))
    }
}

/// Steps may come back as a list or as a single string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StepsField {
    Many(Vec<String>),
    One(String),
}

impl Default for StepsField {
    fn default() -> Self {
        StepsField::Many(Vec::new())
    }
}

impl From<StepsField> for Vec<String> {
    fn from(steps: StepsField) -> Self {
        match steps {
            StepsField::Many(steps) => steps,
            StepsField::One(step) => vec![step],
        }
    }
}

/// A single test case as returned by the model. All fields are optional on
/// the wire; missing ones fall back to empty strings / Medium.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedCase {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub preconditions: String,
    #[serde(default)]
    pub steps: StepsField,
    #[serde(default)]
    pub expected_result: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Top-level payload the prompt asks the model to produce.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationPayload {
    #[serde(default)]
    pub positive: Vec<GeneratedCase>,
    #[serde(default)]
    pub negative: Vec<GeneratedCase>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    pub kind: TestKind,
    pub id: String,
    pub title: String,
    pub preconditions: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub priority: Priority,
}

impl TestCase {
    pub fn from_generated(case: GeneratedCase, kind: TestKind) -> Self {
        Self {
            kind,
            id: case.id,
            title: case.title,
            preconditions: case.preconditions,
            steps: case.steps.into(),
            expected_result: case.expected_result,
            priority: case.priority,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestSuite {
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn from_payload(payload: GenerationPayload) -> Self {
        let mut cases = Vec::with_capacity(payload.positive.len() + payload.negative.len());
        for case in payload.positive {
            cases.push(TestCase::from_generated(case, TestKind::Positive));
        }
        for case in payload.negative {
            cases.push(TestCase::from_generated(case, TestKind::Negative));
        }
        Self { cases }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn positive_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.kind == TestKind::Positive)
            .count()
    }

    pub fn negative_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.kind == TestKind::Negative)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_lenient() {
        assert_eq!(Priority::parse_lenient("High"), Priority::High);
        assert_eq!(Priority::parse_lenient("LOW"), Priority::Low);
        assert_eq!(Priority::parse_lenient("medium"), Priority::Medium);
        assert_eq!(Priority::parse_lenient("urgent"), Priority::Medium);
        assert_eq!(Priority::parse_lenient(""), Priority::Medium);
    }

    #[test]
    fn test_generated_case_defaults() {
        let case: GeneratedCase = serde_json::from_str("{}").unwrap();
        assert_eq!(case.id, "");
        assert_eq!(case.priority, Priority::Medium);
        let steps: Vec<String> = case.steps.into();
        assert!(steps.is_empty());
    }

    #[test]
    fn test_steps_accepts_string_or_list() {
        let case: GeneratedCase =
            serde_json::from_str(r#"{"steps": ["open page", "click login"]}"#).unwrap();
        let steps: Vec<String> = case.steps.into();
        assert_eq!(steps, vec!["open page", "click login"]);

        let case: GeneratedCase = serde_json::from_str(r#"{"steps": "open page"}"#).unwrap();
        let steps: Vec<String> = case.steps.into();
        assert_eq!(steps, vec!["open page"]);
    }

    #[test]
    fn test_suite_from_payload_orders_positive_first() {
        let payload: GenerationPayload = serde_json::from_str(
            r#"{
                "positive": [{"id": "TC-1", "title": "valid login", "priority": "High"}],
                "negative": [{"id": "TC-2", "title": "bad password"}]
            }"#,
        )
        .unwrap();

        let suite = TestSuite::from_payload(payload);
        assert_eq!(suite.len(), 2);
        assert_eq!(suite.positive_count(), 1);
        assert_eq!(suite.negative_count(), 1);
        assert_eq!(suite.cases[0].kind, TestKind::Positive);
        assert_eq!(suite.cases[0].priority, Priority::High);
        assert_eq!(suite.cases[1].priority, Priority::Medium);
    }
}
