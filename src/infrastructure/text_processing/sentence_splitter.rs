use regex::Regex;
use std::sync::LazyLock;

static CONTROL_OR_FORMAT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\p{Cc}+|\p{Cf}+)").unwrap());

/// Sentences of a text plus the separators that sat between them.
///
/// `separators[i]` sits between `sentences[i]` and `sentences[i + 1]`, so interleaving
/// the two reproduces the input exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentenceSplit {
    pub sentences: Vec<String>,
    pub separators: Vec<String>,
}

/// Splits at whitespace following `.`, `?` or `!`, and at runs of control (`Cc`) or
/// format (`Cf`) characters. Whitespace after an abbreviation such as `e.g.` or `Mr.` is
/// not a split.
pub fn split_sentences(text: &str) -> SentenceSplit {
    if text.is_empty() {
        return SentenceSplit::default();
    }

    let mut split = SentenceSplit::default();
    let mut sentence_start = 0;
    let mut offset = 0;

    while let Some(ch) = text[offset..].chars().next() {
        let rest = &text[offset..];
        let run_len = if ch.is_whitespace() && ends_sentence(&text[..offset]) {
            rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len())
        } else if let Some(run) = CONTROL_OR_FORMAT_RUN.find(rest) {
            run.end()
        } else {
            offset += ch.len_utf8();
            continue;
        };

        let end = offset + run_len;
        split.sentences.push(text[sentence_start..offset].to_string());
        split.separators.push(text[offset..end].to_string());
        sentence_start = end;
        offset = end;
    }

    split.sentences.push(text[sentence_start..].to_string());
    split
}

fn ends_sentence(before: &str) -> bool {
    let tail: Vec<char> = before.chars().rev().take(4).collect();
    match tail.as_slice() {
        ['.', ..] if is_abbreviation(&tail) => false,
        ['.' | '?' | '!', ..] => true,
        _ => false,
    }
}

/// `tail` holds the last characters in reverse order, the full stop first.
fn is_abbreviation(tail: &[char]) -> bool {
    let dotted = matches!(tail, ['.', b, '.', a, ..] if a.is_alphanumeric() && b.is_alphanumeric());
    let titled = matches!(tail, ['.', b, a, ..] if a.is_uppercase() && b.is_lowercase());
    dotted || titled
}
