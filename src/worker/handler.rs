//! Worker thread implementation for asynchronous search execution.
//!
//! This module runs all storage operations on a dedicated background thread so
//! the UI loop never blocks on file I/O or query execution. The thread owns the
//! storage backend outright; the UI side keeps only a [`WorkerHandle`] with the
//! command and outcome channels.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use crate::domain::error::{Result, TeiSearchError};
use crate::domain::query::SearchQuery;
use crate::storage::backend::Storage;
use crate::worker::messages::{SearchCommand, SearchOutcome};

/// Worker state: the storage backend and the dispatch logic around it.
///
/// Runs on the thread spawned by [`spawn_search_worker`] and processes commands
/// sent from the UI thread until the channel closes or a shutdown arrives.
pub struct SearchWorker {
    storage: Box<dyn Storage>,
}

impl SearchWorker {
    /// Creates a worker around an already-opened storage backend.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Helper for handling storage operation results with consistent logging.
    ///
    /// This function standardizes error handling and success logging across all
    /// storage operations in the worker. Failures become [`SearchOutcome::Failed`]
    /// stamped with the generation of the dispatch they answer, if any.
    fn outcome_of<T, F>(
        operation: &str,
        generation: Option<u64>,
        result: Result<T>,
        on_success: F,
    ) -> SearchOutcome
    where
        F: FnOnce(T) -> SearchOutcome,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "storage operation failed");
                SearchOutcome::Failed {
                    generation,
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Handles the `LoadCatalog` command.
    ///
    /// Retrieves the full program and attribute catalog in one outcome so the
    /// presenter can bind the selector and form together.
    fn handle_load_catalog(&mut self) -> SearchOutcome {
        let programs = self.storage.programs();
        let attributes = self.storage.attributes();

        Self::outcome_of(
            "load catalog",
            None,
            programs.and_then(|programs| attributes.map(|attributes| (programs, attributes))),
            |(programs, attributes)| {
                tracing::debug!(
                    program_count = programs.len(),
                    attribute_count = attributes.len(),
                    "catalog loaded from storage"
                );
                SearchOutcome::CatalogLoaded {
                    programs,
                    attributes,
                }
            },
        )
    }

    /// Handles the `Execute` command.
    ///
    /// Runs the query against storage and stamps the outcome with the dispatch
    /// generation so the UI side can drop superseded responses.
    fn handle_execute(&mut self, generation: u64, query: &SearchQuery) -> SearchOutcome {
        Self::outcome_of(
            "execute search",
            Some(generation),
            self.storage.search(query),
            |results| {
                tracing::debug!(
                    generation = generation,
                    total = results.pager.total,
                    "search executed"
                );
                SearchOutcome::ResultsReady {
                    generation,
                    results,
                }
            },
        )
    }

    /// Processes a worker command and returns the appropriate outcome.
    ///
    /// This is the main dispatch entry point. `Shutdown` is handled by the
    /// thread loop before it reaches here.
    pub fn handle_command(&mut self, command: SearchCommand) -> Option<SearchOutcome> {
        let span = tracing::debug_span!("worker_handle_command", command = ?command);
        let _guard = span.entered();

        match command {
            SearchCommand::LoadCatalog => Some(self.handle_load_catalog()),
            SearchCommand::Execute { generation, query } => {
                Some(self.handle_execute(generation, &query))
            }
            SearchCommand::Shutdown => None,
        }
    }
}

/// UI-side handle to the worker thread.
///
/// Commands flow in through [`WorkerHandle::dispatch`]; the event loop drains
/// outcomes each tick with [`WorkerHandle::try_outcome`]. Dropping the handle
/// without calling [`WorkerHandle::shutdown`] detaches the thread; the storage
/// backend still flushes via its own `Drop` when the channel closes.
pub struct WorkerHandle {
    commands: Sender<SearchCommand>,
    outcomes: Receiver<SearchOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Sends a command to the worker thread.
    ///
    /// # Errors
    ///
    /// Returns a worker error if the thread has exited and the channel closed.
    pub fn dispatch(&self, command: SearchCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|e| TeiSearchError::Worker(format!("worker channel closed: {e}")))
    }

    /// Receives the next pending outcome without blocking.
    ///
    /// Returns `Ok(None)` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns a worker error if the thread has exited and the channel closed.
    pub fn try_outcome(&self) -> Result<Option<SearchOutcome>> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TeiSearchError::Worker(
                "worker outcome channel disconnected".to_string(),
            )),
        }
    }

    /// Stops the worker loop and joins the thread.
    ///
    /// # Errors
    ///
    /// Returns a worker error if the thread panicked.
    pub fn shutdown(mut self) -> Result<()> {
        tracing::debug!("shutting down search worker");

        // A closed channel already means the loop has exited.
        let _ = self.commands.send(SearchCommand::Shutdown);

        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| TeiSearchError::Worker("worker thread panicked".to_string()))?;
        }
        Ok(())
    }
}

/// Spawns the search worker thread around an opened storage backend.
///
/// The thread processes commands until `Shutdown` arrives or the command
/// channel closes, then drops the storage (flushing any dirty state).
///
/// # Errors
///
/// Returns an error if the OS refuses to spawn the thread.
pub fn spawn_search_worker(storage: Box<dyn Storage>) -> Result<WorkerHandle> {
    let (command_tx, command_rx) = mpsc::channel::<SearchCommand>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<SearchOutcome>();

    let thread = std::thread::Builder::new()
        .name("teisearch-worker".to_string())
        .spawn(move || {
            let mut worker = SearchWorker::new(storage);
            tracing::debug!("search worker started");

            while let Ok(command) = command_rx.recv() {
                let Some(outcome) = worker.handle_command(command) else {
                    break;
                };
                if outcome_tx.send(outcome).is_err() {
                    tracing::debug!("outcome channel closed, stopping worker");
                    break;
                }
            }

            tracing::debug!("search worker stopped");
        })?;

    Ok(WorkerHandle {
        commands: command_tx,
        outcomes: outcome_rx,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Program, SearchResults, TrackedEntityAttribute, TrackedEntityInstance};
    use crate::domain::query::SearchQuery;
    use crate::storage::{seed_demo_data, JsonStorage};
    use std::time::Duration;

    /// Storage double whose reads always fail.
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn programs(&self) -> Result<Vec<Program>> {
            Err(TeiSearchError::Storage("disk on fire".to_string()))
        }
        fn attributes(&self) -> Result<Vec<TrackedEntityAttribute>> {
            Err(TeiSearchError::Storage("disk on fire".to_string()))
        }
        fn attributes_for_program(&self, _: &str) -> Result<Vec<TrackedEntityAttribute>> {
            Err(TeiSearchError::Storage("disk on fire".to_string()))
        }
        fn search(&self, _: &SearchQuery) -> Result<SearchResults> {
            Err(TeiSearchError::Storage("disk on fire".to_string()))
        }
        fn put_program(&mut self, _: &Program) -> Result<()> {
            Ok(())
        }
        fn put_attribute(&mut self, _: &TrackedEntityAttribute) -> Result<()> {
            Ok(())
        }
        fn put_instance(&mut self, _: &TrackedEntityInstance) -> Result<()> {
            Ok(())
        }
        fn put_instances_batch(&mut self, _: &[TrackedEntityInstance]) -> Result<usize> {
            Ok(0)
        }
        fn save(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn seeded_storage() -> (tempfile::TempDir, Box<dyn Storage>) {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("entities.json")).unwrap();
        seed_demo_data(&mut storage).unwrap();
        (dir, Box::new(storage))
    }

    fn recv(handle: &WorkerHandle) -> SearchOutcome {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = handle.try_outcome().unwrap() {
                return outcome;
            }
            assert!(std::time::Instant::now() < deadline, "worker never answered");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn catalog_command_returns_programs_and_attributes() {
        let (_dir, storage) = seeded_storage();
        let handle = spawn_search_worker(storage).unwrap();
        handle.dispatch(SearchCommand::load_catalog()).unwrap();

        match recv(&handle) {
            SearchOutcome::CatalogLoaded {
                programs,
                attributes,
            } => {
                assert_eq!(programs.len(), 3);
                assert_eq!(attributes.len(), 5);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        handle.shutdown().unwrap();
    }

    #[test]
    fn execute_echoes_the_dispatch_generation() {
        let (_dir, storage) = seeded_storage();
        let handle = spawn_search_worker(storage).unwrap();
        handle
            .dispatch(SearchCommand::execute(7, SearchQuery::new(50)))
            .unwrap();

        match recv(&handle) {
            SearchOutcome::ResultsReady {
                generation,
                results,
            } => {
                assert_eq!(generation, 7);
                assert_eq!(results.pager.total, 8);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        handle.shutdown().unwrap();
    }

    #[test]
    fn storage_failures_become_failed_outcomes() {
        let handle = spawn_search_worker(Box::new(FailingStorage)).unwrap();
        handle
            .dispatch(SearchCommand::execute(3, SearchQuery::new(50)))
            .unwrap();

        match recv(&handle) {
            SearchOutcome::Failed {
                generation,
                message,
            } => {
                assert_eq!(generation, Some(3));
                assert!(message.contains("execute search"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        handle.shutdown().unwrap();
    }
}
