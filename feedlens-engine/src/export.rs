//! Delimited-text export of comment lists.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use feedlens_common::{Error, Result};
use tracing::{debug, warn};

use crate::corpus::Comment;
use crate::label::Label;

/// Fixed header line of every export.
pub const EXPORT_HEADER: &str = "Intent,Theme,Stakeholder,Strength Score,Summary,Keywords";

/// Separator between keywords inside the keywords field.
pub const KEYWORD_SEPARATOR: &str = ";";

/// Render `comments` as CSV text, one quoted row per comment in input order.
///
/// The whole export fails on the first structurally invalid comment.
pub fn to_delimited_text<'a, I>(comments: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Comment>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut rows = 0usize;
    for comment in comments {
        if let Some(reason) = comment.structural_problem() {
            warn!(id = %comment.id, %reason, "Rejected comment during export");
            return Err(Error::malformed_export(comment.id.clone(), reason));
        }

        writer
            .write_record([
                comment.intent.as_str(),
                comment.theme.as_str(),
                comment.stakeholder.as_str(),
                comment.strength_score.to_string().as_str(),
                comment.summary.as_str(),
                comment.keywords.join(KEYWORD_SEPARATOR).as_str(),
            ])
            .map_err(|e| Error::Internal(format!("CSV write failed: {e}")))?;
        rows += 1;
    }

    let body = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV flush failed: {e}")))?;
    let body = String::from_utf8(body)
        .map_err(|e| Error::Internal(format!("CSV output is not UTF-8: {e}")))?;

    debug!(rows, bytes = body.len(), "Exported comments");

    let mut text = String::with_capacity(EXPORT_HEADER.len() + 1 + body.len());
    text.push_str(EXPORT_HEADER);
    text.push('\n');
    text.push_str(&body);
    Ok(text)
}

/// Download name for an export, e.g. `feedback-analysis-supportive-all.csv`.
pub fn export_file_name(prefix: &str, intent: Option<&Label>, theme: Option<&Label>) -> String {
    format!(
        "{}-{}-{}.csv",
        prefix,
        intent.map_or("all", Label::as_str),
        theme.map_or("all", Label::as_str),
    )
}
