//! Push Use Case
//!
//! Sends every file to every destination and collects the outcomes.
//! Destinations are independent: one failing (or panicking) destination never
//! stops the others.

use std::path::PathBuf;
use std::thread;

use crate::domain::ports::Transport;
use crate::domain::value_objects::TransferOutcome;

use super::handler::BackupHandler;

/// Outcome of one file at one destination
#[derive(Debug, Clone)]
pub struct PushEntry {
    pub destination: String,
    pub file: PathBuf,
    pub outcome: TransferOutcome,
}

/// Result of a push run
#[derive(Debug, Clone, Default)]
pub struct PushReport {
    pub entries: Vec<PushEntry>,
}

impl PushReport {
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PushEntry> {
        self.entries.iter().filter(|e| !e.outcome.is_success())
    }

    pub fn succeeded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }
}

/// Push options
#[derive(Debug, Clone, Copy, Default)]
pub struct PushOptions {
    /// Drive each destination on its own thread
    pub parallel: bool,
}

/// Push `files` to every handler, file-major when sequential.
pub fn push_files<T: Transport>(
    handlers: &mut [BackupHandler<T>],
    files: &[PathBuf],
    options: PushOptions,
) -> PushReport {
    if options.parallel && handlers.len() > 1 {
        return push_parallel(handlers, files);
    }

    let mut report = PushReport::default();
    for file in files {
        for handler in handlers.iter() {
            report.entries.push(PushEntry {
                destination: handler.display_name(),
                file: file.clone(),
                outcome: handler.process_detailed(file),
            });
        }
    }
    report
}

/// One thread per destination; each destination still sees files in order.
fn push_parallel<T: Transport>(handlers: &mut [BackupHandler<T>], files: &[PathBuf]) -> PushReport {
    let per_destination: Vec<Vec<PushEntry>> = thread::scope(|scope| {
        let workers: Vec<_> = handlers
            .iter_mut()
            .map(|handler| {
                let handler: &mut BackupHandler<T> = handler;
                scope.spawn(move || {
                    let destination = handler.display_name();
                    files
                        .iter()
                        .map(|file| PushEntry {
                            destination: destination.clone(),
                            file: file.clone(),
                            outcome: handler.process_detailed(file),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        // process_detailed contains transport panics, so join only fails on
        // a bug in this function.
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or_default())
            .collect()
    });

    PushReport {
        entries: per_destination.into_iter().flatten().collect(),
    }
}
