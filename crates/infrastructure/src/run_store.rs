//! Run files and metrics documents.
//!
//! A run file is JSON Lines: one object per producer output, as written by the
//! run-execution harness. This module is the only place that knows that schema;
//! everything downstream sees [`EvaluatedRecord`]s.

use agent_eval_application::{PipelineOutput, PipelineStats};
use agent_eval_domain::{EvaluatedRecord, EvaluationReport, TaskKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::{Error, Result};

const UNKNOWN_SOURCE: &str = "unknown";

/// One line of a run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Task source the instance came from
    #[serde(default, alias = "task_source_id")]
    pub benchmark: Option<String>,

    /// Producer that generated the output
    #[serde(alias = "producer_id")]
    pub agent: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(default, alias = "task_kind", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    /// Generated text
    #[serde(alias = "prediction")]
    pub output: String,

    #[serde(default)]
    pub reference: Option<String>,

    #[serde(default)]
    pub evidence: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_out: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl From<RunRecord> for EvaluatedRecord {
    fn from(run: RunRecord) -> Self {
        let kind = run
            .task_type
            .as_deref()
            .map(TaskKind::parse)
            .unwrap_or_default();
        let source = run.benchmark.unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        let record = EvaluatedRecord::new(run.agent, source, kind, run.output)
            .with_evidence(run.evidence.unwrap_or_default());

        match run.reference {
            Some(reference) => record.with_reference(reference),
            None => record,
        }
    }
}

/// Streaming reader over a run file.
///
/// Yields one item per non-blank line. A line that does not parse yields
/// [`Error::Parse`] with its 1-based line number; reading continues with the next line.
pub struct RecordReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Number of lines consumed so far, including blank ones
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<EvaluatedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str::<RunRecord>(trimmed)
                    .map(EvaluatedRecord::from)
                    .map_err(|source| Error::Parse {
                        line: self.line_number,
                        source,
                    }),
            );
        }
    }
}

/// Open a run file for streaming.
pub fn open_records(path: &Path) -> Result<RecordReader<BufReader<File>>> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "Opened run file");
    Ok(RecordReader::new(BufReader::new(file)))
}

/// The persisted result of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub stats: PipelineStats,

    /// Input lines that could not be parsed
    #[serde(default)]
    pub skipped_lines: u64,

    #[serde(flatten)]
    pub report: EvaluationReport,
}

impl MetricsDocument {
    pub fn new(output: PipelineOutput) -> Self {
        Self {
            generated_at: Some(Utc::now()),
            stats: output.stats,
            skipped_lines: 0,
            report: output.report,
        }
    }

    pub fn with_skipped_lines(mut self, skipped_lines: u64) -> Self {
        self.skipped_lines = skipped_lines;
        self
    }
}

/// Write a metrics document as pretty JSON, creating parent directories as needed.
pub fn write_metrics(path: &Path, document: &MetricsDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        producers = document.report.overall.len(),
        "Wrote metrics document"
    );
    Ok(())
}

/// Load a metrics document.
///
/// Documents holding only `overall` and `by_benchmark` tables are accepted.
pub fn read_metrics(path: &Path) -> Result<MetricsDocument> {
    let file = File::open(path)?;
    let document = serde_json::from_reader(BufReader::new(file))?;
    Ok(document)
}
