//! Plain-text rendering of pipeline output.

use std::fmt::{self, Write};

use finsum_rag::ScoredPassage;
use finsum_scoring::{BiasReport, SentimentResult};

use crate::pipeline::{ArticleAnalysis, SentimentView};

/// Economic terms emphasised in rendered summaries. Matching is exact and
/// case-sensitive.
pub const HIGHLIGHT_TERMS: [&str; 5] = [
    "interest rate",
    "inflation",
    "growth",
    "unemployment",
    "recession",
];

/// Wrap every occurrence of a [`HIGHLIGHT_TERMS`] entry in `**`.
#[must_use]
pub fn highlight(summary: &str) -> String {
    HIGHLIGHT_TERMS
        .iter()
        .fold(summary.to_string(), |text, term| {
            text.replace(term, &format!("**{term}**"))
        })
}

#[must_use]
pub fn render_analysis(analysis: &ArticleAnalysis) -> String {
    to_string(|out| write_analysis(out, analysis))
}

#[must_use]
pub fn render_sentiment(result: &SentimentResult) -> String {
    let view = SentimentView::from(result.clone());
    to_string(|out| write_sentiment(out, &view))
}

#[must_use]
pub fn render_bias(report: &BiasReport) -> String {
    to_string(|out| write_bias(out, report))
}

#[must_use]
pub fn render_passages(passages: &[ScoredPassage]) -> String {
    to_string(|out| write_passages(out, passages))
}

/// Writing into a `String` never fails.
fn to_string(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    let _ = write(&mut out);
    out
}

/// Article, summary, scores and related passages as `##` sections.
fn write_analysis(out: &mut impl Write, analysis: &ArticleAnalysis) -> fmt::Result {
    writeln!(out, "## Article")?;
    writeln!(out, "{}", analysis.article.trim_end())?;

    writeln!(out, "\n## Summary")?;
    writeln!(out, "{}", highlight(&analysis.summary))?;

    writeln!(out, "\n## Sentiment")?;
    write_sentiment(out, &analysis.sentiment)?;

    writeln!(out, "\n## Bias")?;
    match &analysis.bias {
        Some(report) => write_bias(out, report)?,
        None => writeln!(out, "unavailable")?,
    }

    writeln!(out, "\n## Related passages")?;
    if analysis.related.is_empty() {
        writeln!(out, "none")?;
    }
    for (i, passage) in analysis.related.iter().enumerate() {
        writeln!(out, "- Doc {}: {passage}", i + 1)?;
    }
    Ok(())
}

fn write_sentiment(out: &mut impl Write, view: &SentimentView) -> fmt::Result {
    writeln!(out, "label: {}", view.label)?;
    for (label, p) in &view.scores {
        writeln!(out, "  {label:<8} {p:.3}")?;
    }
    Ok(())
}

fn write_bias(out: &mut impl Write, report: &BiasReport) -> fmt::Result {
    writeln!(
        out,
        "{} (left {:.3}, right {:.3})",
        report.verdict, report.sim_left, report.sim_right
    )
}

fn write_passages(out: &mut impl Write, passages: &[ScoredPassage]) -> fmt::Result {
    for (rank, passage) in passages.iter().enumerate() {
        writeln!(
            out,
            "{}. [{:.3}] {}",
            rank + 1,
            passage.similarity,
            passage.text
        )?;
    }
    Ok(())
}
