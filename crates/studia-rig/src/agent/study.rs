//! Study agent: structured analysis of study material.

use rig::agent::Agent;
use rig::completion::Prompt;
use rig::providers::gemini;

use crate::Result;
use crate::material::StudyMaterial;
use crate::provider::CompletionProvider;

const NAME: &str = "StudyAgent";
const DESCRIPTION: &str =
    "Agent that analyzes study material into summaries, quizzes, flashcards, and mind maps";

const PREAMBLE: &str = "\
You are a study assistant that turns learning material into structured study aids.
Work only from the provided content. Be accurate and concise.
Always respond with a single valid JSON object and nothing else.";

const RESULT_SHAPE: &str = r#"{
  "summary": "Concise summary of the content",
  "explanation": "Detailed explanation of key concepts in simple language",
  "quizQuestions": [
    {"type": "mcq", "question": "Question text", "options": ["A", "B", "C", "D"], "correct": 0},
    {"type": "short_answer", "question": "Question text", "answer": "Expected answer"}
  ],
  "flashcards": [{"front": "Question or term", "back": "Answer or definition"}],
  "keyTopics": ["topic1", "topic2", "topic3"],
  "mindMapData": {
    "central": "Main topic",
    "branches": [{"name": "Branch 1", "subtopics": ["subtopic1", "subtopic2"]}]
  }
}"#;

/// Agent that produces structured study material.
///
/// Text analysis covers handwritten and textbook uploads, whose text was
/// already extracted by OCR. Image analysis covers diagrams, where the model
/// reads the image itself and may report its own `extractedText`.
pub struct StudyAgent {
    agent: Agent<gemini::completion::CompletionModel>,
}

impl StudyAgent {
    /// Creates a new study agent with the given completion provider.
    pub fn new(provider: &CompletionProvider) -> Self {
        let agent = provider
            .agent()
            .name(NAME)
            .description(DESCRIPTION)
            .preamble(PREAMBLE)
            .build();
        Self { agent }
    }

    /// Analyzes already-extracted text into study material.
    pub async fn analyze_text(
        &self,
        extracted_text: &str,
        user_prompt: &str,
        content_label: &str,
    ) -> Result<StudyMaterial> {
        let prompt = format!(
            "Content Type: {content_label}\n\
             User Request: {user_prompt}\n\
             Extracted Text: {extracted_text}\n\n\
             Based on the above content, provide a comprehensive analysis in the \
             following JSON format:\n{RESULT_SHAPE}\n\n\
             Ensure the response is valid JSON format only."
        );

        let raw = self.agent.prompt(&prompt).await?;

        tracing::debug!(
            target: crate::TRACING_TARGET,
            response_len = raw.len(),
            "text analysis complete"
        );

        Ok(StudyMaterial::parse(&raw))
    }

    /// Analyzes an image directly into study material.
    ///
    /// Used for diagrams, where visual structure matters more than the raw
    /// text. The result's `extractedText` field carries whatever text the
    /// model itself read from the image.
    pub async fn analyze_image(
        &self,
        image_base64: &str,
        user_prompt: &str,
        content_label: &str,
    ) -> Result<StudyMaterial> {
        let prompt = format!(
            "Content Type: {content_label}\n\
             User Request: {user_prompt}\n\n\
             Analyze this {content_label} image and provide a comprehensive \
             analysis in the following JSON format, including an \"extractedText\" \
             field with all text found in the image:\n{RESULT_SHAPE}\n\n\
             Ensure the response is valid JSON format only. For diagrams, focus on \
             explaining the visual elements and their relationships.\n\n\
             [Image: {image_base64}]"
        );

        let raw = self.agent.prompt(&prompt).await?;

        tracing::debug!(
            target: crate::TRACING_TARGET,
            response_len = raw.len(),
            "image analysis complete"
        );

        Ok(StudyMaterial::parse(&raw))
    }
}
