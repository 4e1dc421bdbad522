use crate::domain::Marker;

const FENCE: &str = "```";
const LIST_NAME: &str = "sections";

/// Extracts the `sections = [...]` marker list from an LLM response.
///
/// Fenced code blocks are tried in order and the last qualifying one wins; a block
/// qualifies when its body starts with the assignment and holds nothing after the list.
/// When no fenced block qualifies, every `sections` occurrence in the bare response is
/// tried and again the last one that parses wins. The list is validated
/// against a small grammar and never evaluated:
///
/// ```text
/// list   := '[' ( quoted ( ',' quoted )* ','? )? ']'
/// quoted := '\'' marker '\'' | '"' marker '"'
/// ```
///
/// Returns `None` when nothing qualifies.
pub fn parse_boundaries(response: &str) -> Option<Vec<Marker>> {
    fenced_blocks(response)
        .into_iter()
        .filter_map(|block| parse_assignment(block, true))
        .last()
        .or_else(|| {
            response
                .match_indices(LIST_NAME)
                .filter_map(|(at, _)| parse_assignment(&response[at..], false))
                .last()
        })
}

fn fenced_blocks(response: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = response;
    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            break;
        };
        blocks.push(strip_language_tag(&after_open[..close]));
        rest = &after_open[close + FENCE.len()..];
    }
    blocks
}

/// Drops an optional language tag on the opening fence line, e.g. `python`.
fn strip_language_tag(block: &str) -> &str {
    let trimmed = block.trim_start_matches([' ', '\t']);
    match trimmed.split_once('\n') {
        Some((first, body))
            if !first.trim().is_empty()
                && first
                    .trim()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
        {
            body
        }
        _ => trimmed,
    }
}

fn parse_assignment(text: &str, whole_block: bool) -> Option<Vec<Marker>> {
    let rest = text.trim_start().strip_prefix(LIST_NAME)?;
    let rest = rest.trim_start().strip_prefix('=')?;
    let mut cursor = ListCursor::new(rest.trim_start());
    let markers = cursor.list()?;
    (!whole_block || cursor.trailing_is_blank()).then_some(markers)
}

struct ListCursor<'a> {
    rest: &'a str,
}

impl<'a> ListCursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn list(&mut self) -> Option<Vec<Marker>> {
        self.expect('[')?;
        let mut markers = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(']') {
                return Some(markers);
            }
            markers.push(self.quoted_marker()?);
            self.skip_whitespace();
            if self.eat(']') {
                return Some(markers);
            }
            self.expect(',')?;
        }
    }

    fn quoted_marker(&mut self) -> Option<Marker> {
        let quote = self.rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        let body = &self.rest[quote.len_utf8()..];
        let close = body.find(quote)?;
        let marker = Marker::parse(body[..close].trim())?;
        self.rest = &body[close + quote.len_utf8()..];
        Some(marker)
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, expected: char) -> Option<()> {
        self.skip_whitespace();
        self.eat(expected).then_some(())
    }

    /// Anything after the closing bracket must be whitespace or a semicolon.
    fn trailing_is_blank(&self) -> bool {
        self.rest
            .trim()
            .trim_end_matches(';')
            .trim()
            .is_empty()
    }
}
