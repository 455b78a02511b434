//! Background loading with cancellation.
//!
//! The spreadsheet is fetched and parsed on a worker thread so the UI keeps
//! drawing. Once a task is cancelled, or dropped, its result is never handed
//! out, even if the worker finishes afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info};

use super::loader::{LoadError, Source, SpreadsheetLoader};
use crate::domain::Record;

pub type LoadOutcome = Result<Vec<Record>, LoadError>;

#[derive(Debug)]
pub struct LoadTask {
    source: Source,
    receiver: Receiver<LoadOutcome>,
    cancelled: Arc<AtomicBool>,
}

impl LoadTask {
    /// Starts loading `source` with [`SpreadsheetLoader::load`].
    pub fn spawn(source: Source) -> Self {
        let worker_source = source.clone();
        Self::spawn_with(source, move || SpreadsheetLoader::load(&worker_source))
    }

    /// Starts a task running an arbitrary load function.
    pub fn spawn_with<F>(source: Source, load: F) -> Self
    where
        F: FnOnce() -> LoadOutcome + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker_cancelled = Arc::clone(&cancelled);

        info!(source = %source, "loading spreadsheet");
        thread::spawn(move || {
            let outcome = load();
            if worker_cancelled.load(Ordering::SeqCst) {
                debug!("load finished after cancellation, result discarded");
                return;
            }
            // The receiver is gone only if the owning task was dropped.
            let _ = sender.send(outcome);
        });

        Self {
            source,
            receiver,
            cancelled,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Returns the outcome once the worker is done, `None` while it is still
    /// running or after the task was cancelled.
    pub fn poll(&self) -> Option<LoadOutcome> {
        if self.is_cancelled() {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Interrupted)),
        }
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            info!(source = %self.source, "cancelled pending load");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, EMAIL_COLUMN};
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn wait_for(task: &LoadTask) -> LoadOutcome {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(outcome) = task.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "load task did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn dummy_source() -> Source {
        Source::Path(PathBuf::from("users.xlsx"))
    }

    #[test]
    fn test_spawn_loads_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "email,country_name").unwrap();
        writeln!(file, "a@x.gov.in,India").unwrap();
        writeln!(file, "c@test.com,USA").unwrap();
        file.flush().unwrap();

        let task = LoadTask::spawn(Source::Path(file.path().to_path_buf()));
        let records = wait_for(&task).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get(EMAIL_COLUMN), Some(&CellValue::from("c@test.com")));
    }

    #[test]
    fn test_spawn_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let task = LoadTask::spawn(Source::Path(dir.path().join("nope.xlsx")));

        assert!(matches!(wait_for(&task), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_pending_poll_returns_none() {
        let (release, gate) = mpsc::channel::<()>();
        let task = LoadTask::spawn_with(dummy_source(), move || {
            let _ = gate.recv();
            Ok(Vec::new())
        });

        assert!(task.poll().is_none());
        release.send(()).unwrap();
        assert!(wait_for(&task).unwrap().is_empty());
    }

    #[test]
    fn test_cancelled_result_is_discarded() {
        let (release, gate) = mpsc::channel::<()>();
        let (finished, done) = mpsc::channel::<()>();
        let task = LoadTask::spawn_with(dummy_source(), move || {
            let _ = gate.recv();
            let _ = finished.send(());
            Ok(vec![Record::new()])
        });

        task.cancel();
        assert!(task.is_cancelled());
        release.send(()).unwrap();
        done.recv_timeout(Duration::from_secs(10)).unwrap();
        thread::sleep(Duration::from_millis(20));

        assert!(task.poll().is_none());
    }

    #[test]
    fn test_panicking_worker_reports_interrupted() {
        let task = LoadTask::spawn_with(dummy_source(), || panic!("worker blew up"));
        assert!(matches!(wait_for(&task), Err(LoadError::Interrupted)));
    }
}
