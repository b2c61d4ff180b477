//! Standalone report: per-subject verdict blocks written as text or as a
//! streamed JSON array.
//!
//! Text:
//!
//! ```text
//! ----src/main.c----
//! GPL-2.0-only,MIT :: true
//! ----all licenses with their compatibility----
//! GPL-2.0-only,MIT :: true
//! ```
//!
//! JSON (one element per subject, then the package-level element):
//!
//! ```json
//! [
//!   {"file":"src/main.c","results":[{"license":["GPL-2.0-only","MIT"],"compatibility":true}]},
//!   {"package-level-result":[{"license":["GPL-2.0-only","MIT"],"compatibility":true}]}
//! ]
//! ```

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use accord_core::{LicensePair, Outcome, ResultStore, StoreError, Subject, Verdict};
use serde::Serialize;

const AGGREGATE_HEADER: &str = "all licenses with their compatibility";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// One emitted line: a pair and how it was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub main: String,
    pub sub: String,
    pub outcome: Outcome,
}

/// In-memory sink collecting the rows of one subject.
///
/// Never reports a pair as already evaluated.
#[derive(Debug, Default)]
pub struct ReportStore {
    rows: Vec<ReportRow>,
}

impl ReportStore {
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<ReportRow> {
        self.rows
    }
}

impl ResultStore<String> for ReportStore {
    async fn exists(&self, _pair: &LicensePair<String>) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn record(&mut self, pair: &LicensePair<String>, verdict: Verdict) -> Result<(), StoreError> {
        self.rows.push(ReportRow {
            main: pair.main.name.clone(),
            sub: pair.sub.name.clone(),
            outcome: verdict.outcome,
        });
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    license: [&'a str; 2],
    compatibility: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonBlock<'a> {
    File {
        file: String,
        results: Vec<JsonRow<'a>>,
    },
    Package {
        #[serde(rename = "package-level-result")]
        results: Vec<JsonRow<'a>>,
    },
}

struct EmitterState<W> {
    out: W,
    blocks: usize,
}

/// Writes subject blocks to a shared stream.
///
/// Each block is rendered outside the lock and written whole inside it, so
/// blocks from concurrent workers never interleave.
pub struct ReportEmitter<W> {
    format: ReportFormat,
    default_outcome: bool,
    state: Mutex<EmitterState<W>>,
}

impl<W: Write + Send> ReportEmitter<W> {
    /// `default_outcome` is what undetermined pairs render as.
    pub const fn new(out: W, format: ReportFormat, default_outcome: bool) -> Self {
        Self {
            format,
            default_outcome,
            state: Mutex::new(EmitterState { out, blocks: 0 }),
        }
    }

    /// Write the report preamble.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn begin(&self) -> io::Result<()> {
        if self.format == ReportFormat::Json {
            let mut state = self.lock();
            state.out.write_all(b"[\n")?;
            state.out.flush()?;
        }
        Ok(())
    }

    /// Write one subject block.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, or a serialization error as
    /// `io::ErrorKind::InvalidData`.
    pub fn emit(&self, subject: &Subject, rows: &[ReportRow]) -> io::Result<()> {
        let block = match self.format {
            ReportFormat::Text => self.render_text(subject, rows),
            ReportFormat::Json => self.render_json(subject, rows)?,
        };

        let mut state = self.lock();
        if self.format == ReportFormat::Json && state.blocks > 0 {
            state.out.write_all(b",\n")?;
        }
        state.out.write_all(block.as_bytes())?;
        state.out.flush()?;
        state.blocks += 1;
        Ok(())
    }

    /// Close the report and hand back the writer.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn finish(self) -> io::Result<W> {
        let format = self.format;
        let mut state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        if format == ReportFormat::Json {
            state.out.write_all(b"\n]\n")?;
        }
        state.out.flush()?;
        Ok(state.out)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EmitterState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render_text(&self, subject: &Subject, rows: &[ReportRow]) -> String {
        let header = match subject {
            Subject::Aggregate => AGGREGATE_HEADER.to_string(),
            other => other.to_string(),
        };
        let mut text = format!("----{header}----\n");
        for row in rows {
            text.push_str(&format!(
                "{},{} :: {}\n",
                row.main,
                row.sub,
                row.outcome.resolve(self.default_outcome)
            ));
        }
        text
    }

    fn render_json(&self, subject: &Subject, rows: &[ReportRow]) -> io::Result<String> {
        let results = rows
            .iter()
            .map(|row| JsonRow {
                license: [row.main.as_str(), row.sub.as_str()],
                compatibility: row.outcome.resolve(self.default_outcome),
            })
            .collect();
        let block = match subject {
            Subject::Aggregate => JsonBlock::Package { results },
            other => JsonBlock::File {
                file: other.to_string(),
                results,
            },
        };
        let json = serde_json::to_string(&block)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(format!("  {json}"))
    }
}
