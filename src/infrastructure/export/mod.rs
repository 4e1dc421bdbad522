mod csv_section_sink;

pub use csv_section_sink::CsvSectionSink;
