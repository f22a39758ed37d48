//! Prompt assembly for retrieval-augmented answers

use crate::index::SearchHit;

/// Builds the generation prompt from retrieved chunks and the question
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved chunk texts into the context block
    pub fn build_context(hits: &[SearchHit]) -> String {
        let mut context = String::new();

        for (i, hit) in hits.iter().enumerate() {
            let mut source_ref = hit.source.filename.clone();
            if let Some(page) = hit.source.page {
                source_ref.push_str(&format!(", page {}", page));
            }
            context.push_str(&format!("[{}] {}\n{}\n\n", i + 1, source_ref, hit.text));
        }

        context
    }

    /// Full QA prompt
    ///
    /// The insufficient-information instruction is a behavioral contract
    /// with the model, not an enforced invariant: a model that ignores it
    /// still produces a valid response.
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use the following context to answer the question. If you cannot answer based on the context, say "I don't have enough information to answer this question."

Context:
{context}

Question: {question}

Answer:"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkSource, FileFormat};

    fn hit(text: &str, filename: &str) -> SearchHit {
        SearchHit {
            text: text.to_string(),
            source: ChunkSource {
                filename: filename.to_string(),
                format: FileFormat::Text,
                page: None,
                chunk_index: 0,
            },
            score: 0.9,
        }
    }

    #[test]
    fn context_carries_every_chunk_and_its_source() {
        let hits = vec![hit("first chunk", "a.txt"), hit("second chunk", "b.txt")];
        let context = PromptBuilder::build_context(&hits);
        assert!(context.contains("first chunk"));
        assert!(context.contains("second chunk"));
        assert!(context.contains("a.txt"));
        assert!(context.contains("[2] b.txt"));
    }

    #[test]
    fn prompt_embeds_question_context_and_refusal_instruction() {
        let prompt = PromptBuilder::build_qa_prompt("What is X?", "X is a thing.");
        assert!(prompt.contains("Question: What is X?"));
        assert!(prompt.contains("X is a thing."));
        assert!(prompt.contains("I don't have enough information"));
    }
}
