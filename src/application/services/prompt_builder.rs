/// Builds the single prompt string sent verbatim to the inference service.
///
/// The context is not truncated; an oversized prompt is left for the
/// inference service to reject.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}\n\nAnswer:")
}

