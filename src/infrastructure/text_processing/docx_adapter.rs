use std::io::{Cursor, Read};

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, TextBlock};

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the paragraphs of a WordprocessingML package, one block per `<w:p>`.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("invalid docx archive: {e}")))?;

        let mut part = archive.by_name(DOCUMENT_PART).map_err(|_| {
            FileLoaderError::ExtractionFailed(format!("{DOCUMENT_PART} missing from archive"))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read {DOCUMENT_PART}: {e}"))
        })?;
        Ok(xml)
    }
}

#[derive(Default)]
struct ParagraphState {
    depth: usize,
    in_run: bool,
    in_text: bool,
    text: String,
    picture: Option<String>,
}

impl ParagraphState {
    fn finish(&mut self, blocks: &mut Vec<TextBlock>) {
        let text = std::mem::take(&mut self.text);
        let picture = self.picture.take();
        if !text.trim().is_empty() {
            blocks.push(TextBlock::new(text, None));
        } else if let Some(name) = picture {
            blocks.push(TextBlock::image_placeholder(&name));
        }
    }
}

/// Walks the XML tag by tag. Text is only taken from `<w:t>` elements, so field codes,
/// properties and deleted runs (`<w:delText>`) never leak into the output.
pub fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<TextBlock>, FileLoaderError> {
    let mut blocks = Vec::new();
    let mut state = ParagraphState::default();
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if state.in_text {
            state.text.push_str(&decode_entities(&rest[..open]));
        }
        let close = rest[open..]
            .find('>')
            .ok_or_else(|| FileLoaderError::ExtractionFailed("unterminated xml tag".to_string()))?;
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let closing = tag.starts_with('/');
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();

        match (name, closing) {
            ("w:p", false) if !self_closing => state.depth += 1,
            ("w:p", true) => {
                state.depth = state.depth.saturating_sub(1);
                if state.depth == 0 {
                    state.finish(&mut blocks);
                }
            }
            ("w:r", false) => state.in_run = !self_closing,
            ("w:r", true) => state.in_run = false,
            ("w:t", false) => state.in_text = !self_closing,
            ("w:t", true) => state.in_text = false,
            ("w:tab", false) if state.in_run => state.text.push('\t'),
            ("w:br" | "w:cr", false) if state.in_run => state.text.push('\n'),
            ("wp:docPr" | "pic:cNvPr", false) if state.depth > 0 => {
                if state.picture.is_none() {
                    state.picture = Some(attribute(tag, "name").unwrap_or("image").to_string());
                }
            }
            ("v:imagedata", false) if state.depth > 0 => {
                state.picture.get_or_insert_with(|| "image".to_string());
            }
            _ => {}
        }
    }

    Ok(blocks)
}

fn attribute<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!(" {key}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').and_then(|semi| {
            let entity = &after[..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_blocks(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<TextBlock>, FileLoaderError> {
        if document.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let data = data.to_vec();
        let blocks = tokio::task::spawn_blocking(move || {
            let xml = Self::read_document_part(&data)?;
            paragraphs_from_document_xml(&xml)
        })
        .await
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        tracing::info!(paragraphs = blocks.len(), "DOCX paragraph extraction complete");

        if blocks.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }
        Ok(blocks)
    }
}
