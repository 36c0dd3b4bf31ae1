//! Sweep results storage as JSON Lines
//!
//! The first line is a `header` record. Every grid point then adds one
//! `raw_result` record per mode followed by one `modal_composite` record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Local, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::analysis::SearchSpace;
use crate::error::FsmResult;
use crate::results::{GridPointResult, IterationResult, ModalComposite};

/// Show progress every this many grid points by default
pub const DEFAULT_PAGINATE_BY: usize = 100;

/// Describes the run that produced a results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub generator_name: String,
    pub generator_version: String,
    /// Local time, whole seconds, written as RFC 3339
    pub created_at: DateTime<Local>,
    /// Verbatim data file contents
    pub data_file: String,
    /// Length of every mode shape vector
    pub dof_count: usize,
    pub a_count: usize,
    pub t_b_count: usize,
    pub m_count: usize,
}

impl Header {
    pub fn new(data_file: &str, dof_count: usize, space: &SearchSpace) -> Self {
        Self {
            generator_name: env!("CARGO_PKG_NAME").to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Local::now().trunc_subsecs(0),
            data_file: data_file.to_string(),
            dof_count,
            a_count: space.a.len(),
            t_b_count: space.t_b.len(),
            m_count: space.m.len(),
        }
    }
}

/// One line of a results file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    Header(Header),
    RawResult(IterationResult),
    ModalComposite(ModalComposite),
}

/// Streams sweep results into a JSON Lines sink
pub struct ResultsWriter<W: Write> {
    out: W,
    paginate_by: usize,
    points_written: usize,
}

impl ResultsWriter<BufWriter<File>> {
    /// Create (or truncate) a results file
    pub fn create(path: impl AsRef<Path>, paginate_by: usize) -> FsmResult<Self> {
        let file = File::create(path.as_ref())?;
        log::info!("Writing results to '{}'", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file), paginate_by))
    }
}

impl<W: Write> ResultsWriter<W> {
    pub fn new(out: W, paginate_by: usize) -> Self {
        Self {
            out,
            paginate_by: paginate_by.max(1),
            points_written: 0,
        }
    }

    fn write_record(&mut self, record: &Record) -> FsmResult<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_header(&mut self, header: Header) -> FsmResult<()> {
        self.write_record(&Record::Header(header))
    }

    /// Write the raw results and the modal composite of one grid point
    pub fn write_point(&mut self, point: &GridPointResult) -> FsmResult<()> {
        for raw in &point.raw {
            self.write_record(&Record::RawResult(raw.clone()))?;
        }
        self.write_record(&Record::ModalComposite(point.composite.clone()))?;
        self.points_written += 1;
        Ok(())
    }

    /// Number of grid points written so far
    pub fn points_written(&self) -> usize {
        self.points_written
    }

    /// Write every result of a sweep, logging progress
    ///
    /// Stops at the first error, after flushing what was already written.
    pub fn store<I>(&mut self, results: I, total: usize) -> FsmResult<usize>
    where
        I: IntoIterator<Item = FsmResult<GridPointResult>>,
    {
        log::info!("Performing a parameter sweep and storing its results...");
        let start = Instant::now();
        let width = total.to_string().len();

        for result in results {
            let point = match result {
                Ok(point) => point,
                Err(e) => {
                    self.out.flush()?;
                    return Err(e);
                }
            };
            self.write_point(&point)?;

            let done = self.points_written;
            if done % self.paginate_by == 0 {
                log::info!(
                    "{:6.2}% ({:>width$}/{:>width$} grid points)",
                    100.0 * done as f64 / total.max(1) as f64,
                    done,
                    total,
                    width = width
                );
            }
        }
        self.out.flush()?;

        let elapsed = start.elapsed().as_secs_f64();
        log::info!(
            "Completed in {:.2} second(s), {:.3} millisecond(s) per grid point",
            elapsed,
            1000.0 * elapsed / self.points_written.max(1) as f64
        );

        Ok(self.points_written)
    }

    /// Flush and return the underlying sink
    pub fn into_inner(mut self) -> FsmResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
