//! Content type enumeration for uploaded study material.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Classification of uploaded study material.
///
/// Corresponds to the `CONTENT_TYPE` PostgreSQL enum. The value is supplied
/// by the uploader and drives which collaborators the analysis pipeline
/// invokes: diagrams go through image analysis, the other two through plain
/// OCR plus text analysis.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ContentType"]
#[strum(serialize_all = "snake_case")]
pub enum ContentType {
    /// Handwritten notes.
    #[db_rename = "handwritten"]
    #[serde(rename = "handwritten")]
    Handwritten,

    /// Printed textbook or document page.
    #[db_rename = "textbook"]
    #[serde(rename = "textbook")]
    Textbook,

    /// Diagram, chart, or other mostly-visual material.
    #[db_rename = "diagram"]
    #[serde(rename = "diagram")]
    Diagram,
}

impl ContentType {
    /// Returns whether analysis of this content goes through the image path
    /// instead of plain text extraction.
    #[inline]
    pub fn is_diagram(self) -> bool {
        matches!(self, ContentType::Diagram)
    }

    /// Returns the lowercase label used in prompts and API payloads.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Handwritten => "handwritten",
            ContentType::Textbook => "textbook",
            ContentType::Diagram => "diagram",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&ContentType::Handwritten).unwrap();
        assert_eq!(json, "\"handwritten\"");
    }

    #[test]
    fn parses_from_label() {
        let parsed: ContentType = "diagram".parse().unwrap();
        assert_eq!(parsed, ContentType::Diagram);
        assert!(parsed.is_diagram());
    }
}
