use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

/// NFKC-normalizes extracted text, re-joins words hyphenated across line breaks and
/// collapses whitespace. Blank-line paragraph breaks survive as `\n\n`.
pub fn sanitize_extracted_text(raw: &str) -> String {
    sanitized_paragraphs(raw).join("\n\n")
}

/// The sanitized text split into its blank-line separated paragraphs. Lines within a
/// paragraph are kept on separate lines.
pub fn sanitized_paragraphs(raw: &str) -> Vec<String> {
    let normalized: String = raw.nfkc().collect();
    let joined = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut paragraphs = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    for line in joined.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !lines.is_empty() {
                paragraphs.push(lines.join("\n"));
                lines.clear();
            }
        } else {
            lines.push(collapsed);
        }
    }
    if !lines.is_empty() {
        paragraphs.push(lines.join("\n"));
    }
    paragraphs
}
