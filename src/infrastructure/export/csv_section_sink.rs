use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::application::ports::{SectionSink, SinkError};
use crate::domain::Section;

const HEADER: [&str; 4] = ["documentTitle", "referenceMarker", "content", "pageNumber"];

/// Writes sections as CSV rows in append order, header first.
///
/// Rows are encoded into a buffer and reach the output in one `write_all`, so an encoding
/// error never leaves part of a document in the file.
pub struct CsvSectionSink<W: Write> {
    out: W,
    header_written: bool,
}

impl CsvSectionSink<File> {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> CsvSectionSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    fn encode(&self, sections: &[Section]) -> Result<Vec<u8>, SinkError> {
        let mut rows = csv::Writer::from_writer(Vec::new());
        if !self.header_written {
            rows.write_record(HEADER).map_err(write_failed)?;
        }
        for section in sections {
            let page = section.page.map(|p| p.to_string()).unwrap_or_default();
            rows.write_record([
                section.document_title.as_str(),
                &section.marker.to_string(),
                &section.content,
                &page,
            ])
            .map_err(write_failed)?;
        }
        rows.into_inner().map_err(write_failed)
    }

    fn append(&mut self, sections: &[Section]) -> Result<(), SinkError> {
        let bytes = self.encode(sections)?;
        self.out.write_all(&bytes)?;
        self.header_written = true;
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, SinkError> {
        self.finish()?;
        Ok(self.out)
    }
}

fn write_failed(e: impl std::fmt::Display) -> SinkError {
    SinkError::WriteFailed(e.to_string())
}

impl<W: Write> SectionSink for CsvSectionSink<W> {
    fn write(&mut self, section: &Section) -> Result<(), SinkError> {
        self.append(std::slice::from_ref(section))
    }

    fn write_document(&mut self, sections: &[Section]) -> Result<(), SinkError> {
        self.append(sections)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if !self.header_written {
            self.append(&[])?;
        }
        self.out.flush()?;
        Ok(())
    }
}
