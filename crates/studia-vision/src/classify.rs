//! Best-effort content classification from image annotations.
//!
//! This is a heuristic, not ground truth: the primary upload flow takes the
//! content class as explicit user input, and this classifier backs the
//! annotation path where no class was supplied.

use strum::{Display, EnumString};

use crate::TRACING_TARGET_CLASSIFY;
use crate::annotation::ImageAnnotation;

/// Label words that indicate handwritten material.
const HANDWRITING_INDICATORS: &[&str] = &["handwriting", "writing", "pen", "pencil", "notebook"];

/// Label words that indicate printed/textbook material.
const TEXTBOOK_INDICATORS: &[&str] = &["book", "page", "document", "text"];

/// Label words that indicate diagrams.
const DIAGRAM_INDICATORS: &[&str] = &["diagram", "chart", "graph", "illustration", "drawing"];

/// Text markers typical for informal handwritten notes.
const INFORMAL_MARKERS: &[&str] = &["my", "i think", "note:", "remember", "??", "todo"];

/// Text markers typical for typeset textbook content.
const FORMAL_MARKERS: &[&str] = &[
    "chapter",
    "definition",
    "theorem",
    "figure",
    "table",
    "reference",
];

/// Extracted text shorter than this counts as "limited" for the
/// diagram heuristic.
const LIMITED_TEXT_LEN: usize = 100;

/// Classification of uploaded study material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ContentClass {
    /// Handwritten notes.
    Handwritten,
    /// Printed textbook or document page.
    Textbook,
    /// Diagram, chart, or other mostly-visual material.
    Diagram,
}

impl ContentClass {
    /// Classifies an annotated image.
    ///
    /// Heuristics are applied in order: diagram signals win over handwriting
    /// signals, which win over textbook signals; with no label signal at all
    /// the decision falls back to lexical markers in the extracted text.
    pub fn from_annotation(annotation: &ImageAnnotation) -> Self {
        let has_objects = !annotation.objects.is_empty();
        let has_limited_text = annotation.text.len() < LIMITED_TEXT_LEN;

        let class = if annotation.has_label_like(DIAGRAM_INDICATORS)
            || (has_objects && has_limited_text)
        {
            Self::Diagram
        } else if annotation.has_label_like(HANDWRITING_INDICATORS) {
            Self::Handwritten
        } else if annotation.has_label_like(TEXTBOOK_INDICATORS)
            || annotation.text.len() > LIMITED_TEXT_LEN
        {
            Self::Textbook
        } else {
            Self::from_text(&annotation.text)
        };

        tracing::debug!(
            target: TRACING_TARGET_CLASSIFY,
            class = %class,
            labels = annotation.labels.len(),
            objects = annotation.objects.len(),
            text_len = annotation.text.len(),
            "image classified"
        );

        class
    }

    /// Guesses a content class from text characteristics alone.
    ///
    /// Images with almost no text and no label signal are treated as
    /// diagrams; otherwise informal markers suggest handwritten notes and
    /// everything else defaults to textbook material.
    pub fn from_text(text: &str) -> Self {
        if text.len() < 10 {
            return Self::Diagram;
        }

        let lowered = text.to_lowercase();
        let informal = INFORMAL_MARKERS.iter().any(|m| lowered.contains(m));
        let formal = FORMAL_MARKERS.iter().any(|m| lowered.contains(m));

        match (informal, formal) {
            (true, _) => Self::Handwritten,
            (false, true) => Self::Textbook,
            // Unmarked prose defaults to textbook material.
            (false, false) => Self::Textbook,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{LabelAnnotation, ObjectAnnotation};

    fn annotation(text: &str, labels: &[&str], objects: &[&str]) -> ImageAnnotation {
        ImageAnnotation {
            text: text.to_string(),
            labels: labels
                .iter()
                .map(|name| LabelAnnotation {
                    name: name.to_string(),
                    confidence: 0.9,
                })
                .collect(),
            objects: objects
                .iter()
                .map(|name| ObjectAnnotation {
                    name: name.to_string(),
                    confidence: 0.8,
                })
                .collect(),
        }
    }

    #[test]
    fn diagram_labels_win() {
        let ann = annotation("long text ".repeat(20).as_str(), &["Flow chart"], &[]);
        assert_eq!(ContentClass::from_annotation(&ann), ContentClass::Diagram);
    }

    #[test]
    fn objects_with_limited_text_mean_diagram() {
        let ann = annotation("short", &[], &["Whiteboard"]);
        assert_eq!(ContentClass::from_annotation(&ann), ContentClass::Diagram);
    }

    #[test]
    fn handwriting_labels_beat_textbook_labels() {
        let ann = annotation("some notes", &["Handwriting", "Document"], &[]);
        // Ordered heuristics: the diagram check fails, handwriting wins.
        assert_eq!(
            ContentClass::from_annotation(&ann),
            ContentClass::Handwritten
        );
    }

    #[test]
    fn long_text_without_labels_is_textbook() {
        let ann = annotation(&"word ".repeat(50), &[], &[]);
        assert_eq!(ContentClass::from_annotation(&ann), ContentClass::Textbook);
    }

    #[test]
    fn tiny_text_without_signals_is_diagram() {
        let ann = annotation("ab", &[], &[]);
        assert_eq!(ContentClass::from_annotation(&ann), ContentClass::Diagram);
    }

    #[test]
    fn informal_markers_suggest_handwritten() {
        assert_eq!(
            ContentClass::from_text("remember to review this before the exam"),
            ContentClass::Handwritten
        );
    }

    #[test]
    fn formal_markers_suggest_textbook() {
        assert_eq!(
            ContentClass::from_text("see chapter 4 for the full derivation"),
            ContentClass::Textbook
        );
    }

    #[test]
    fn plain_text_defaults_to_textbook() {
        assert_eq!(
            ContentClass::from_text("photosynthesis converts light into energy"),
            ContentClass::Textbook
        );
    }
}
