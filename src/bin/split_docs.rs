//! split_docs: splits every document under a directory into sections and writes them to
//! one CSV file (`documentTitle,referenceMarker,content,pageNumber`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use docsense::application::ports::{LlmClient, SectionSink};
use docsense::application::services::{
    BatchReport, BatchSplitService, DocumentOutcome, FailureStage, SourceDocument,
};
use docsense::domain::ContentType;
use docsense::infrastructure::export::CsvSectionSink;
use docsense::infrastructure::llm::OpenAiClient;
use docsense::infrastructure::observability::{TracingConfig, init_tracing};
use docsense::infrastructure::text_processing::{CompositeFileLoader, TextSplitterFactory};
use docsense::presentation::{ChunkingStrategy, Settings};

#[derive(Parser, Debug)]
#[command(name = "split_docs", version, about)]
struct Cli {
    /// Directory searched recursively for .docx, .pdf and .txt files.
    input_dir: PathBuf,

    /// CSV file to create.
    output_csv: PathBuf,

    /// Splitting strategy; defaults to the configured one.
    #[arg(long, value_enum, env = "SPLIT_DOCS_STRATEGY")]
    strategy: Option<ChunkingStrategy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let (settings, _) = Settings::load().context("Failed to load settings")?;
    init_tracing(
        &TracingConfig::default()
            .with_settings(&settings.logging.level, settings.logging.enable_json),
    );

    let strategy = cli.strategy.unwrap_or(settings.chunking.strategy);
    let llm_client: Arc<dyn LlmClient> =
        Arc::new(OpenAiClient::new(&settings.llm).context("Failed to build LLM client")?);
    let service = BatchSplitService::new(
        Arc::new(CompositeFileLoader::with_default_adapters()),
        TextSplitterFactory::create(strategy, &settings.chunking, llm_client),
    );

    let mut sink = CsvSectionSink::create(&cli.output_csv)
        .with_context(|| format!("Failed to create {}", cli.output_csv.display()))?;

    let mut report = BatchReport::default();
    for path in collect_documents(&cli.input_dir) {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let Some(content_type) = ContentType::from_path(&path) else {
            continue;
        };

        let outcome = match tokio::fs::read(&path).await {
            Ok(data) => {
                let source = SourceDocument {
                    filename,
                    content_type,
                    data,
                };
                service.process(source, &mut sink).await
            }
            Err(e) => DocumentOutcome::failed(filename, FailureStage::Extraction, e),
        };
        report.outcomes.push(outcome);
    }
    sink.finish().context("Failed to flush CSV output")?;

    for failure in report.failures() {
        if let DocumentOutcome::Failed {
            filename,
            stage,
            message,
        } = failure
        {
            eprintln!("{filename}: {stage}: {message}");
        }
    }
    tracing::info!(
        documents = report.outcomes.len(),
        sections = report.section_count(),
        output = %cli.output_csv.display(),
        "Batch split finished"
    );

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn collect_documents(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| ContentType::from_path(path).is_some())
        .collect();
    paths.sort();
    paths
}
