//! Line protocol spoken with the job scheduler.
//!
//! The agent writes `OK` to ask for work and reads one upload id per line.
//! `CLOSE` or end of input ends the session. Progress goes out as
//! `HEART: <processed>` and the session ends with `BYE <code>`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use accord_engine::Heartbeat;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// Scheduler command that ends the session.
const CLOSE: &str = "CLOSE";

pub struct SchedulerLink<R, W> {
    input: R,
    output: Arc<Mutex<W>>,
    processed: Arc<AtomicU64>,
}

impl<R: AsyncBufRead + Unpin, W: Write + Send> SchedulerLink<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output: Arc::new(Mutex::new(output)),
            processed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Ask for the next job. `None` ends the session.
    ///
    /// Waiting for the scheduler suspends only the calling task.
    pub async fn next_job(&mut self) -> io::Result<Option<String>> {
        self.send("OK")?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line == CLOSE {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }

    /// Heartbeat sharing this link's output and counter.
    pub fn heartbeat(&self) -> LinkHeartbeat<W> {
        LinkHeartbeat {
            output: Arc::clone(&self.output),
            processed: Arc::clone(&self.processed),
        }
    }

    /// End the session with an exit code.
    pub fn bye(&self, code: i32) -> io::Result<()> {
        self.send(&format!("BYE {code}"))
    }

    fn send(&self, line: &str) -> io::Result<()> {
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// Reports the running total of processed subjects to the scheduler.
pub struct LinkHeartbeat<W> {
    output: Arc<Mutex<W>>,
    processed: Arc<AtomicU64>,
}

impl<W: Write + Send> Heartbeat for LinkHeartbeat<W> {
    fn beat(&self, completed: u64) {
        let total = self.processed.fetch_add(completed, Ordering::Relaxed) + completed;
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(out, "HEART: {total}").and_then(|()| out.flush()) {
            warn!(%error, "heartbeat could not be sent");
        }
    }
}

/// Interpret a job line as an upload id. Anything unparsable is upload 0.
pub fn parse_upload(line: &str) -> i64 {
    line.trim().parse().unwrap_or(0)
}
