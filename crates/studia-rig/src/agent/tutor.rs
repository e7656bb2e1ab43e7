//! Tutor agent: follow-up chat about analyzed material.

use rig::agent::Agent;
use rig::completion::Prompt;
use rig::providers::gemini;
use serde::Deserialize;

use crate::Result;
use crate::material::{MindMap, StudyMaterial};
use crate::provider::CompletionProvider;

const NAME: &str = "TutorAgent";
const DESCRIPTION: &str = "Agent that answers student questions about analyzed study material";

const PREAMBLE: &str = "\
You are an AI tutor helping a student understand their study material.
Answer clearly and helpfully, grounded in the provided content and analysis.
If the question asks for a mind map, respond with a JSON object of the form
{\"type\": \"mindmap\", \"data\": {\"central\": \"Main topic\", \"branches\": [{\"name\": \"Branch 1\", \"subtopics\": [\"subtopic1\"]}]}}
and nothing else. Otherwise respond with plain text.";

/// A tutor reply, either plain text or a mind map.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorReply {
    /// Raw reply content as returned by the model.
    pub content: String,
    /// Mind-map payload, present when the reply was a mind map.
    pub mind_map: Option<MindMap>,
}

impl TutorReply {
    /// Interprets raw model output.
    ///
    /// A reply that parses as a JSON object tagged `"type": "mindmap"` is a
    /// mind-map reply; anything else, including malformed JSON, is plain
    /// text.
    pub fn from_raw(raw: String) -> Self {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            kind: String,
            data: MindMap,
        }

        let mind_map = serde_json::from_str::<Tagged>(raw.trim())
            .ok()
            .filter(|tagged| tagged.kind == "mindmap")
            .map(|tagged| tagged.data);

        Self {
            content: raw,
            mind_map,
        }
    }

    /// Returns whether this reply carries a mind map.
    pub fn is_mind_map(&self) -> bool {
        self.mind_map.is_some()
    }
}

/// Agent for follow-up questions about an analysis.
pub struct TutorAgent {
    agent: Agent<gemini::completion::CompletionModel>,
}

impl TutorAgent {
    /// Creates a new tutor agent with the given completion provider.
    pub fn new(provider: &CompletionProvider) -> Self {
        let agent = provider
            .agent()
            .name(NAME)
            .description(DESCRIPTION)
            .preamble(PREAMBLE)
            .build();
        Self { agent }
    }

    /// Answers a student question in the context of an analysis.
    pub async fn answer(
        &self,
        question: &str,
        material: &StudyMaterial,
        extracted_text: &str,
    ) -> Result<TutorReply> {
        let analysis_json = serde_json::to_string(material)?;
        let prompt = format!(
            "Original Content: {extracted_text}\n\
             Previous Analysis: {analysis_json}\n\
             Student Question: {question}\n\n\
             Provide a helpful, clear answer to the student's question based on \
             the uploaded content and analysis."
        );

        let raw = self.agent.prompt(&prompt).await?;

        tracing::debug!(
            target: crate::TRACING_TARGET,
            response_len = raw.len(),
            "tutor reply generated"
        );

        Ok(TutorReply::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_reply_has_no_mind_map() {
        let reply = TutorReply::from_raw("Mitosis has four phases.".to_string());
        assert!(!reply.is_mind_map());
        assert_eq!(reply.content, "Mitosis has four phases.");
    }

    #[test]
    fn tagged_json_reply_is_a_mind_map() {
        let raw = r#"{"type":"mindmap","data":{"central":"Mitosis","branches":[{"name":"Phases","subtopics":["Prophase","Metaphase"]}]}}"#;
        let reply = TutorReply::from_raw(raw.to_string());

        assert!(reply.is_mind_map());
        let map = reply.mind_map.expect("mind map");
        assert_eq!(map.central, "Mitosis");
        assert_eq!(map.branches[0].subtopics.len(), 2);
    }

    #[test]
    fn json_with_other_tag_stays_plain_text() {
        let raw = r#"{"type":"table","data":{"central":"x","branches":[]}}"#;
        let reply = TutorReply::from_raw(raw.to_string());
        assert!(!reply.is_mind_map());
    }

    #[test]
    fn malformed_json_stays_plain_text() {
        let reply = TutorReply::from_raw("{\"type\": \"mindmap\", ".to_string());
        assert!(!reply.is_mind_map());
    }
}
