//! Text summarization backends.
//!
//! The hosted LLM backend is an external collaborator; this crate ships a
//! local extractive stand-in so the tool surface works without one.

use crate::error::{AgentError, AgentResult};

/// Default number of sentences kept by [`LeadSentenceSummarizer`].
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// A text summarization backend.
pub trait Summarizer: Send + Sync {
    /// Summarize `text` in at most `max_sentences` sentences.
    fn summarize(&self, text: &str, max_sentences: usize) -> AgentResult<String>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Keeps the leading sentences of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadSentenceSummarizer;

impl Summarizer for LeadSentenceSummarizer {
    fn summarize(&self, text: &str, max_sentences: usize) -> AgentResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::InvalidArgument(
                "text cannot be empty".to_string(),
            ));
        }
        if max_sentences == 0 {
            return Err(AgentError::InvalidArgument(
                "max_sentences must be at least 1".to_string(),
            ));
        }

        let sentences = split_sentences(text);
        Ok(sentences
            .into_iter()
            .take(max_sentences)
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn name(&self) -> &str {
        "lead-sentence"
    }
}

/// Split on `.`, `!` or `?` followed by whitespace or end of text.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_leading_sentences() {
        let text = "First point. Second point! Third point? Fourth point.";
        let summary = LeadSentenceSummarizer.summarize(text, 2).unwrap();
        assert_eq!(summary, "First point. Second point!");
    }

    #[test]
    fn test_short_text_unchanged() {
        let summary = LeadSentenceSummarizer
            .summarize("  Only one sentence here.  ", DEFAULT_MAX_SENTENCES)
            .unwrap();
        assert_eq!(summary, "Only one sentence here.");
    }

    #[test]
    fn test_decimal_points_do_not_split() {
        let text = "Revenue grew 3.5 percent. Costs fell.";
        let summary = LeadSentenceSummarizer.summarize(text, 1).unwrap();
        assert_eq!(summary, "Revenue grew 3.5 percent.");
    }

    #[test]
    fn test_unterminated_tail_is_a_sentence() {
        assert_eq!(
            split_sentences("One. Two without stop"),
            vec!["One.", "Two without stop"]
        );
    }

    #[test]
    fn test_rejects_empty_text() {
        assert!(matches!(
            LeadSentenceSummarizer.summarize("   ", 3),
            Err(AgentError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_zero_sentences() {
        assert!(LeadSentenceSummarizer.summarize("Text.", 0).is_err());
    }
}
