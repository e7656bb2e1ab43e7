//! Typed study-material record and the lenient parser for generation output.
//!
//! The generation collaborator returns free text that is *expected* to be a
//! JSON object, possibly wrapped in a fenced code block. Parsing never fails
//! the request: a missing field gets its documented default and an entirely
//! unparsable payload yields the full default record.

use serde::{Deserialize, Serialize};

/// Default summary when generation produced none.
pub const DEFAULT_SUMMARY: &str = "Unable to generate summary";

/// Default explanation when generation produced none.
pub const DEFAULT_EXPLANATION: &str = "Unable to generate explanation";

/// Summary used when the whole payload was unparsable.
pub const FALLBACK_SUMMARY: &str = "Unable to analyze content";

/// Explanation used when the whole payload was unparsable.
pub const FALLBACK_EXPLANATION: &str = "Unable to provide explanation";

/// A quiz question generated from study material.
///
/// The correct answer is a tagged variant: multiple-choice questions carry an
/// index into their options, short-answer questions carry the expected
/// answer text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizQuestion {
    /// Multiple-choice question.
    #[serde(rename = "mcq")]
    MultipleChoice {
        /// Question text.
        question: String,
        /// Answer options, in display order.
        options: Vec<String>,
        /// Index of the correct option.
        #[serde(rename = "correct")]
        correct_index: usize,
    },
    /// Short-answer question.
    ShortAnswer {
        /// Question text.
        question: String,
        /// Expected answer.
        answer: String,
    },
}

impl QuizQuestion {
    /// Returns the question text.
    pub fn question(&self) -> &str {
        match self {
            Self::MultipleChoice { question, .. } => question,
            Self::ShortAnswer { question, .. } => question,
        }
    }
}

/// A front/back flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Question or term.
    pub front: String,
    /// Answer or definition.
    pub back: String,
}

/// A named mind-map branch with its subtopics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapBranch {
    /// Branch name.
    pub name: String,
    /// Subtopics under this branch.
    #[serde(default)]
    pub subtopics: Vec<String>,
}

/// A mind-map tree: central topic plus named branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    /// Central topic.
    pub central: String,
    /// Branches, in display order.
    #[serde(default)]
    pub branches: Vec<MindMapBranch>,
}

impl Default for MindMap {
    fn default() -> Self {
        Self {
            central: "Main Topic".to_string(),
            branches: Vec::new(),
        }
    }
}

/// The structured result of analyzing one study image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    /// Concise summary of the content.
    pub summary: String,
    /// Detailed explanation of key concepts.
    pub explanation: String,
    /// Generated quiz questions.
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    /// Generated flashcards.
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    /// Salient topics, used to drive video search.
    #[serde(default)]
    pub key_topics: Vec<String>,
    /// Mind-map tree, when generation produced one.
    #[serde(rename = "mindMapData", skip_serializing_if = "Option::is_none")]
    pub mind_map: Option<MindMap>,
    /// Text the generation collaborator itself extracted from an image,
    /// present only for diagram analysis.
    #[serde(
        rename = "extractedText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extracted_text: Option<String>,
}

impl StudyMaterial {
    /// The record used when generation output was entirely unparsable.
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            explanation: FALLBACK_EXPLANATION.to_string(),
            quiz_questions: Vec::new(),
            flashcards: Vec::new(),
            key_topics: Vec::new(),
            mind_map: Some(MindMap::default()),
            extracted_text: None,
        }
    }

    /// Parses raw generation output into a structured record.
    ///
    /// Policy: strip a surrounding code fence if present, attempt a JSON
    /// parse, then substitute defaults per missing required field. Quiz
    /// entries that match neither variant are dropped. This function never
    /// fails; the caller always gets a usable record.
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fence(raw.trim());

        let Ok(value) = serde_json::from_str::<serde_json::Value>(cleaned) else {
            tracing::warn!(
                target: crate::TRACING_TARGET,
                len = raw.len(),
                "generation output was not valid json, using fallback material"
            );
            return Self::fallback();
        };

        Self::from_value(value)
    }

    /// Builds a record from a parsed JSON value, field by field.
    fn from_value(value: serde_json::Value) -> Self {
        let summary = non_empty_string(value.get("summary"))
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());
        let explanation = non_empty_string(value.get("explanation"))
            .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

        let quiz_questions = value
            .get("quizQuestions")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let flashcards = value
            .get("flashcards")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let key_topics = value
            .get("keyTopics")
            .and_then(|v| v.as_array())
            .map(|topics| {
                topics
                    .iter()
                    .filter_map(|topic| topic.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mind_map = value
            .get("mindMapData")
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        let extracted_text = non_empty_string(value.get("extractedText"));

        Self {
            summary,
            explanation,
            quiz_questions,
            flashcards,
            key_topics,
            mind_map,
            extracted_text,
        }
    }

    /// Returns the mind map, or the default placeholder when absent.
    pub fn mind_map_or_default(&self) -> MindMap {
        self.mind_map.clone().unwrap_or_default()
    }
}

/// Strips a surrounding markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let stripped = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };

    let stripped = stripped.strip_prefix('\n').unwrap_or(stripped);
    let stripped = stripped.strip_suffix("```").unwrap_or(stripped);
    stripped.strip_suffix('\n').unwrap_or(stripped).trim()
}

/// Extracts a non-empty string field.
fn non_empty_string(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_parses_with_defaults() {
        let material = StudyMaterial::parse("```json\n{\"summary\":\"s\"}\n```");

        assert_eq!(material.summary, "s");
        assert_eq!(material.explanation, DEFAULT_EXPLANATION);
        assert!(material.quiz_questions.is_empty());
        assert!(material.flashcards.is_empty());
        assert!(material.key_topics.is_empty());
    }

    #[test]
    fn bare_fence_without_language_tag() {
        let material = StudyMaterial::parse("```\n{\"summary\":\"bare\"}\n```");
        assert_eq!(material.summary, "bare");
    }

    #[test]
    fn unfenced_json_parses_directly() {
        let material = StudyMaterial::parse(r#"{"summary":"plain","explanation":"e"}"#);
        assert_eq!(material.summary, "plain");
        assert_eq!(material.explanation, "e");
    }

    #[test]
    fn garbage_yields_fallback_record() {
        let material = StudyMaterial::parse("I'm sorry, I cannot do that.");

        assert_eq!(material.summary, FALLBACK_SUMMARY);
        assert_eq!(material.explanation, FALLBACK_EXPLANATION);
        assert!(material.quiz_questions.is_empty());
        assert_eq!(material.mind_map_or_default().central, "Main Topic");
    }

    #[test]
    fn full_payload_round_trips() {
        let raw = r#"{
            "summary": "Cell biology basics",
            "explanation": "Cells are the unit of life.",
            "quizQuestions": [
                {"type": "mcq", "question": "Powerhouse?", "options": ["Nucleus", "Mitochondria"], "correct": 1},
                {"type": "short_answer", "question": "Unit of life?", "answer": "The cell"}
            ],
            "flashcards": [{"front": "ATP", "back": "Energy currency"}],
            "keyTopics": ["cells", "organelles"],
            "mindMapData": {"central": "Cell", "branches": [{"name": "Organelles", "subtopics": ["Nucleus"]}]}
        }"#;

        let material = StudyMaterial::parse(raw);

        assert_eq!(material.quiz_questions.len(), 2);
        assert_eq!(
            material.quiz_questions[0],
            QuizQuestion::MultipleChoice {
                question: "Powerhouse?".to_string(),
                options: vec!["Nucleus".to_string(), "Mitochondria".to_string()],
                correct_index: 1,
            }
        );
        assert_eq!(material.flashcards.len(), 1);
        assert_eq!(material.key_topics, vec!["cells", "organelles"]);
        assert_eq!(material.mind_map.as_ref().unwrap().branches.len(), 1);
    }

    #[test]
    fn malformed_quiz_entries_are_dropped() {
        let raw = r#"{
            "summary": "s",
            "explanation": "e",
            "quizQuestions": [
                {"type": "mcq", "question": "ok", "options": ["a", "b"], "correct": 0},
                {"type": "essay", "question": "unknown variant"},
                "not even an object"
            ]
        }"#;

        let material = StudyMaterial::parse(raw);
        assert_eq!(material.quiz_questions.len(), 1);
    }

    #[test]
    fn empty_summary_gets_default() {
        let material = StudyMaterial::parse(r#"{"summary":"   ","explanation":"e"}"#);
        assert_eq!(material.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn quiz_variant_tags_round_trip() {
        let question = QuizQuestion::ShortAnswer {
            question: "q".to_string(),
            answer: "a".to_string(),
        };
        let json = serde_json::to_value(&question).expect("serialize");
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("short_answer"));

        let mcq = QuizQuestion::MultipleChoice {
            question: "q".to_string(),
            options: vec!["a".to_string()],
            correct_index: 0,
        };
        let json = serde_json::to_value(&mcq).expect("serialize");
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("mcq"));
        assert_eq!(json.get("correct").and_then(|v| v.as_u64()), Some(0));
    }

    #[test]
    fn extracted_text_is_captured_for_diagrams() {
        let material =
            StudyMaterial::parse(r#"{"summary":"s","extractedText":"labels from the figure"}"#);
        assert_eq!(
            material.extracted_text.as_deref(),
            Some("labels from the figure")
        );
    }
}
