//! History-aware query rewriting.
//!
//! Follow-up questions ("is that serious?") are useless as retrieval
//! queries on their own. With prior turns available, the chain rewrites
//! the question into a standalone one; with an empty history the raw
//! input passes through untouched and no model is called.

use crate::llm::{DispatchError, FailoverChain, Prompt, Turn};

use super::prompt::CONTEXTUALIZE_SYSTEM_PROMPT;

/// Produce a standalone retrieval query for `input` given `history`.
pub fn rewrite_query(
    chain: &FailoverChain,
    input: &str,
    history: &[Turn],
) -> Result<String, DispatchError> {
    if history.is_empty() {
        return Ok(input.to_string());
    }

    let prompt =
        Prompt::new(CONTEXTUALIZE_SYSTEM_PROMPT, input).with_history(history.to_vec());
    let rewritten = chain.generate(&prompt)?;

    tracing::debug!(
        original = input,
        rewritten = rewritten.as_str(),
        "Query rewritten for retrieval"
    );

    Ok(rewritten.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatModel;

    #[test]
    fn empty_history_returns_input_without_model_call() {
        let chain = FailoverChain::new(vec![Box::new(MockChatModel::failing("m"))]);
        let out = rewrite_query(&chain, "what causes migraines?", &[]).unwrap();
        assert_eq!(out, "what causes migraines?");
    }

    #[test]
    fn nonempty_history_goes_through_the_chain() {
        let chain = FailoverChain::new(vec![Box::new(MockChatModel::succeeding(
            "m",
            "is a migraine serious?",
        ))]);
        let history = vec![
            Turn::user("what causes migraines?"),
            Turn::assistant("Common triggers include stress and dehydration."),
        ];

        let out = rewrite_query(&chain, "is that serious?", &history).unwrap();
        assert_eq!(out, "is a migraine serious?");
    }

    #[test]
    fn rewrite_failure_propagates() {
        let chain = FailoverChain::new(vec![Box::new(MockChatModel::failing("m"))]);
        let history = vec![Turn::user("hello")];
        let err = rewrite_query(&chain, "and then?", &history).unwrap_err();
        assert!(matches!(err, DispatchError::AllBackendsExhausted { .. }));
    }
}
