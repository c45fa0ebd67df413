//! Grounded summarization prompt.

const PREAMBLE: &str = "You are a financial news summarization assistant.\n\
Below is some background knowledge that may help you:\n\n";

const ARTICLE_HEADER: &str = "And here's the news article:\n";

const INSTRUCTION: &str = "Please summarize the article in 3-4 bullet points and note any potential financial implications.";

/// Assemble the generation prompt from retrieved context and the article.
///
/// Passages are joined with newlines in retrieval order and included in
/// full; any length limiting is left to the generation service.
#[must_use]
pub fn build_prompt<S: AsRef<str>>(article: &str, passages: &[S]) -> String {
    let context = passages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");

    format!("{PREAMBLE}{context}\n\n{ARTICLE_HEADER}{article}\n\n{INSTRUCTION}")
}
