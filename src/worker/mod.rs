//! Background worker thread for asynchronous search execution.
//!
//! This module implements the worker thread that handles all storage I/O to
//! avoid blocking the UI event loop. Commands and outcomes travel over std
//! mpsc channels; search outcomes carry generation stamps so stale responses
//! can be dropped.
//!
//! # Architecture
//!
//! - `messages`: Command/outcome protocol types
//! - `handler`: Worker thread loop, dispatch logic, and the UI-side handle

pub mod handler;
pub mod messages;

pub use handler::{spawn_search_worker, SearchWorker, WorkerHandle};
pub use messages::{SearchCommand, SearchOutcome};
