//! Annotation result types returned by the Vision API.

use serde::{Deserialize, Serialize};

/// Result of a plain text extraction (`TEXT_DETECTION`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextExtraction {
    /// Full extracted text, in reading order as reported by the API.
    pub text: String,
    /// Heuristic extraction confidence in `0.0..=1.0`.
    pub confidence: f32,
}

impl TextExtraction {
    /// Creates an extraction result, deriving the confidence from the text.
    pub fn new(text: String) -> Self {
        let confidence = Self::estimate_confidence(&text);
        Self { text, confidence }
    }

    /// Returns whether any non-whitespace text was extracted.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Estimates extraction confidence from text characteristics.
    ///
    /// The API does not report a document-level confidence for plain text
    /// detection, so longer text and sentence structure raise the estimate.
    fn estimate_confidence(text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut confidence: f32 = 0.5;

        if text.len() > 50 {
            confidence += 0.2;
        }
        if text.len() > 200 {
            confidence += 0.2;
        }

        let sentences = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();
        if sentences > 1 {
            confidence += 0.1;
        }

        confidence.min(1.0)
    }
}

/// A label annotation (`LABEL_DETECTION`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelAnnotation {
    /// Label description, e.g. `"handwriting"`.
    pub name: String,
    /// Detection score in `0.0..=1.0`.
    pub confidence: f32,
}

/// A localized object annotation (`OBJECT_LOCALIZATION`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectAnnotation {
    /// Object name, e.g. `"Whiteboard"`.
    pub name: String,
    /// Detection score in `0.0..=1.0`.
    pub confidence: f32,
}

/// Full annotation of an image: text plus label and object detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnnotation {
    /// Extracted text, empty when the image contains none.
    pub text: String,
    /// Detected labels.
    pub labels: Vec<LabelAnnotation>,
    /// Localized objects.
    pub objects: Vec<ObjectAnnotation>,
}

impl ImageAnnotation {
    /// Returns whether any non-whitespace text was detected.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Returns whether any label matches one of the given indicator words
    /// (case-insensitive substring match).
    pub(crate) fn has_label_like(&self, indicators: &[&str]) -> bool {
        self.labels.iter().any(|label| {
            let name = label.name.to_lowercase();
            indicators.iter().any(|indicator| name.contains(indicator))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_confidence() {
        let extraction = TextExtraction::new(String::new());
        assert_eq!(extraction.confidence, 0.0);
        assert!(!extraction.has_text());
    }

    #[test]
    fn short_text_gets_base_confidence() {
        let extraction = TextExtraction::new("hi".to_string());
        assert_eq!(extraction.confidence, 0.5);
    }

    #[test]
    fn long_structured_text_gets_high_confidence() {
        let text = "The mitochondria is the powerhouse of the cell. \
                    It produces ATP through oxidative phosphorylation. \
                    This process takes place across the inner membrane and \
                    depends on a proton gradient maintained by the electron \
                    transport chain."
            .to_string();
        let extraction = TextExtraction::new(text);
        assert_eq!(extraction.confidence, 1.0);
    }

    #[test]
    fn label_matching_is_case_insensitive() {
        let annotation = ImageAnnotation {
            text: String::new(),
            labels: vec![LabelAnnotation {
                name: "Handwriting".to_string(),
                confidence: 0.9,
            }],
            objects: vec![],
        };
        assert!(annotation.has_label_like(&["handwriting"]));
        assert!(!annotation.has_label_like(&["diagram"]));
    }
}
