use crate::domain::Section;

/// Append-only tabular output for finalized sections.
pub trait SectionSink {
    fn write(&mut self, section: &Section) -> Result<(), SinkError>;

    /// Appends every section of one document. The default writes row by row, so a
    /// failure can leave earlier rows behind; sinks that can stage output override it.
    fn write_document(&mut self, sections: &[Section]) -> Result<(), SinkError> {
        sections.iter().try_for_each(|section| self.write(section))
    }

    fn finish(&mut self) -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
