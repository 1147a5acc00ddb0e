//! Search presenter driving the view from user intent and worker outcomes.
//!
//! This module implements [`SearchPresenter`], the decision layer between the
//! view and the search worker. The view reports what the user did; the
//! presenter records the resulting filter state, dispatches work to the
//! background thread, and pushes complete models back through
//! [`SearchView`](crate::app::SearchView).
//!
//! # Architecture
//!
//! ```text
//! view actions ──> SearchPresenter ──commands──> worker thread
//!      ^                │   ^                        │
//!      │                │   └────────outcomes────────┘
//!      └── set_form / set_programs / swap_data / show_date_dialog
//! ```
//!
//! The presenter is re-initialized on every resume: [`SearchPresenter::init`]
//! reloads the catalog and re-runs the current search so the screen is fresh
//! whenever it regains focus. Already cached catalog content is pushed
//! immediately so resume repaints without waiting for the worker.
//!
//! # Result Generations
//!
//! Every dispatched search is stamped with a monotonically increasing
//! generation. Outcomes carrying an older generation are dropped, so a slow
//! early search can never overwrite the results of a later one.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use teisearch::app::{AppState, SearchPresenter};
//! use teisearch::storage::JsonStorage;
//! use teisearch::ui::theme::Theme;
//! use teisearch::worker::spawn_search_worker;
//!
//! # fn main() -> teisearch::domain::Result<()> {
//! let storage = JsonStorage::new(PathBuf::from("/tmp/entities.json"))?;
//! let worker = spawn_search_worker(Box::new(storage))?;
//! let mut presenter = SearchPresenter::new(worker, 50);
//! let mut view = AppState::new(Theme::default());
//! presenter.init(&mut view)?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::NaiveDate;

use super::view::{DateDialogRequest, SearchView};
use crate::domain::{
    AttributeField, Program, Result, SearchQuery, SearchResults, TrackedEntityAttribute,
};
use crate::worker::{SearchCommand, SearchOutcome, WorkerHandle};

/// A date confirmed in the picker, waiting to be applied as a filter.
struct PickedDate {
    attribute_id: String,
    date: NaiveDate,
}

/// Decision layer between the search screen and the worker thread.
///
/// Owns the authoritative filter state: the selected program scope, the
/// entered attribute values, and the global query. The view keeps its own
/// echo for rendering; on every scope change the presenter pushes a freshly
/// composed form so the two never drift.
pub struct SearchPresenter {
    worker: WorkerHandle,
    page_size: usize,
    programs: Vec<Program>,
    attributes: Vec<TrackedEntityAttribute>,
    catalog_loaded: bool,
    selected_program: Option<Program>,
    values: BTreeMap<String, String>,
    query_text: String,
    latest_generation: u64,
    picked_tx: Sender<PickedDate>,
    picked_rx: Receiver<PickedDate>,
}

impl SearchPresenter {
    /// Creates a presenter over a running worker.
    ///
    /// # Parameters
    ///
    /// * `worker` - Handle to the search worker thread
    /// * `page_size` - Instances requested per result page
    #[must_use]
    pub fn new(worker: WorkerHandle, page_size: usize) -> Self {
        let (picked_tx, picked_rx) = mpsc::channel();
        Self {
            worker,
            page_size,
            programs: Vec::new(),
            attributes: Vec::new(),
            catalog_loaded: false,
            selected_program: None,
            values: BTreeMap::new(),
            query_text: String::new(),
            latest_generation: 0,
            picked_tx,
            picked_rx,
        }
    }

    /// Initializes or re-initializes the screen.
    ///
    /// Called when the screen is entered and again on every resume. Pushes
    /// cached catalog content immediately when available, then asks the
    /// worker for a fresh catalog and re-runs the current search.
    ///
    /// # Errors
    ///
    /// Returns [`TeiSearchError::Worker`](crate::domain::TeiSearchError) when
    /// the worker channel is closed.
    pub fn init(&mut self, view: &mut dyn SearchView) -> Result<()> {
        let _span = tracing::debug_span!(
            "presenter_init",
            cached_catalog = self.catalog_loaded,
            generation = self.latest_generation
        )
        .entered();

        if self.catalog_loaded {
            self.push_catalog(view);
        }
        self.worker.dispatch(SearchCommand::load_catalog())?;
        self.dispatch_search()
    }

    /// Applies a confirmed program selection.
    ///
    /// `None` clears the scope back to the full catalog. Values entered for
    /// attributes that survive the scope change are preserved; the rest are
    /// dropped. Pushes the recomposed form and re-runs the search.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the command channel is closed.
    pub fn set_program(
        &mut self,
        program: Option<Program>,
        view: &mut dyn SearchView,
    ) -> Result<()> {
        let _span = tracing::debug_span!(
            "presenter_set_program",
            program = program.as_ref().map(|p| p.id.as_str())
        )
        .entered();

        self.selected_program = program;
        let scope_ids = self.scope_attribute_ids();
        self.values.retain(|id, _| scope_ids.iter().any(|s| s == id));

        view.set_form(self.scoped_fields(), self.selected_program.as_ref());
        self.dispatch_search()
    }

    /// Records an edited attribute value and re-runs the search.
    ///
    /// An empty or whitespace value removes the filter. The view already
    /// shows the typed text, so no form push happens here.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the command channel is closed.
    pub fn set_attribute_value(&mut self, attribute_id: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            self.values.remove(attribute_id);
        } else {
            self.values
                .insert(attribute_id.to_string(), value.to_string());
        }
        self.dispatch_search()
    }

    /// Records the edited global query and re-runs the search.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the command channel is closed.
    pub fn set_query(&mut self, query: &str) -> Result<()> {
        self.query_text = query.to_string();
        self.dispatch_search()
    }

    /// Re-runs the search with the current filters.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the command channel is closed.
    pub fn search(&mut self) -> Result<()> {
        self.dispatch_search()
    }

    /// Drops every filter, pushes the blanked form, and re-runs the search.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the command channel is closed.
    pub fn clear_filters(&mut self, view: &mut dyn SearchView) -> Result<()> {
        let _span = tracing::debug_span!(
            "presenter_clear_filters",
            dropped_values = self.values.len()
        )
        .entered();

        self.values.clear();
        self.query_text.clear();
        view.set_form(self.scoped_fields(), self.selected_program.as_ref());
        self.dispatch_search()
    }

    /// Opens the date picker for an attribute.
    ///
    /// The dialog listener routes the confirmed date back into this
    /// presenter; [`SearchPresenter::drain_picked_dates`] applies it on the
    /// next runtime tick.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for uniformity with the other
    /// notification methods.
    pub fn pick_date(&mut self, attribute_id: &str, view: &mut dyn SearchView) -> Result<()> {
        let label = self
            .attributes
            .iter()
            .find(|attribute| attribute.id == attribute_id)
            .map_or_else(|| attribute_id.to_string(), |a| a.label.clone());

        let tx = self.picked_tx.clone();
        let id = attribute_id.to_string();
        view.show_date_dialog(DateDialogRequest {
            attribute_id: attribute_id.to_string(),
            label,
            listener: Box::new(move |date| {
                // A closed channel means the presenter is already gone.
                let _ = tx.send(PickedDate {
                    attribute_id: id,
                    date,
                });
            }),
        });
        Ok(())
    }

    /// Applies dates confirmed in the picker since the last tick.
    ///
    /// Each picked date becomes an attribute filter in ISO form, the form is
    /// re-pushed so the field shows the new value, and the search re-runs.
    ///
    /// # Returns
    ///
    /// `true` when at least one date was applied and the frame should be
    /// repainted.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the command channel is closed.
    pub fn drain_picked_dates(&mut self, view: &mut dyn SearchView) -> Result<bool> {
        let mut applied = false;
        while let Ok(picked) = self.picked_rx.try_recv() {
            let value = picked.date.format("%Y-%m-%d").to_string();
            tracing::debug!(attribute = %picked.attribute_id, %value, "date picked");
            self.set_attribute_value(&picked.attribute_id, &value)?;
            applied = true;
        }
        if applied {
            view.set_form(self.scoped_fields(), self.selected_program.as_ref());
        }
        Ok(applied)
    }

    /// Drains pending worker outcomes into the view.
    ///
    /// # Returns
    ///
    /// `true` when at least one outcome was handled and the frame should be
    /// repainted.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the outcome channel is disconnected.
    pub fn process_outcomes(&mut self, view: &mut dyn SearchView) -> Result<bool> {
        let mut handled = false;
        while let Some(outcome) = self.worker.try_outcome()? {
            self.on_worker_outcome(outcome, view)?;
            handled = true;
        }
        Ok(handled)
    }

    /// Applies a single worker outcome to the view.
    ///
    /// Result envelopes from superseded generations are dropped. Failures
    /// become a status line; a failure of the current search additionally
    /// swaps in an empty envelope so stale rows never outlive their query.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for uniformity with the call
    /// chain.
    pub fn on_worker_outcome(
        &mut self,
        outcome: SearchOutcome,
        view: &mut dyn SearchView,
    ) -> Result<()> {
        let _span = tracing::debug_span!("worker_outcome").entered();

        match outcome {
            SearchOutcome::CatalogLoaded {
                programs,
                attributes,
            } => {
                tracing::debug!(
                    programs = programs.len(),
                    attributes = attributes.len(),
                    "catalog loaded"
                );
                self.programs = programs;
                self.attributes = attributes;
                self.catalog_loaded = true;

                // Re-anchor the scope in the fresh catalog; a vanished
                // program falls back to the full catalog.
                self.selected_program = self.selected_program.take().and_then(|previous| {
                    self.programs
                        .iter()
                        .find(|program| program.id == previous.id)
                        .cloned()
                });
                let known: Vec<String> =
                    self.attributes.iter().map(|a| a.id.clone()).collect();
                self.values.retain(|id, _| known.iter().any(|k| k == id));

                self.push_catalog(view);
            }
            SearchOutcome::ResultsReady {
                generation,
                results,
            } => {
                if generation == self.latest_generation {
                    view.swap_data(results);
                } else {
                    tracing::debug!(
                        generation,
                        latest = self.latest_generation,
                        "dropping superseded results"
                    );
                }
            }
            SearchOutcome::Failed {
                generation,
                message,
            } => {
                if generation.is_some() && generation != Some(self.latest_generation) {
                    tracing::debug!(?generation, "dropping superseded failure");
                    return Ok(());
                }
                tracing::warn!(%message, "worker operation failed");
                view.show_status(message);
                if generation.is_some() {
                    view.swap_data(SearchResults::empty());
                }
            }
        }
        Ok(())
    }

    /// Tears down the worker thread.
    ///
    /// # Errors
    ///
    /// Returns a worker error when the thread panicked.
    pub fn shutdown(self) -> Result<()> {
        self.worker.shutdown()
    }

    /// Pushes the cached catalog into the view.
    fn push_catalog(&self, view: &mut dyn SearchView) {
        view.set_programs(self.programs.clone());
        view.set_form(self.scoped_fields(), self.selected_program.as_ref());
    }

    /// Attribute ids visible in the current scope, in form order.
    fn scope_attribute_ids(&self) -> Vec<String> {
        match &self.selected_program {
            Some(program) => program
                .attribute_ids
                .iter()
                .filter(|id| self.attributes.iter().any(|a| &a.id == *id))
                .cloned()
                .collect(),
            None => self.attributes.iter().map(|a| a.id.clone()).collect(),
        }
    }

    /// Composes form fields for the current scope with recorded values.
    fn scoped_fields(&self) -> Vec<AttributeField> {
        self.scope_attribute_ids()
            .iter()
            .filter_map(|id| self.attributes.iter().find(|a| &a.id == id))
            .map(|attribute| match self.values.get(&attribute.id) {
                Some(value) => AttributeField::with_value(attribute.clone(), value.clone()),
                None => AttributeField::new(attribute.clone()),
            })
            .collect()
    }

    /// Stamps a new generation and sends the current filters to the worker.
    fn dispatch_search(&mut self) -> Result<()> {
        self.latest_generation += 1;

        let mut query = SearchQuery::new(self.page_size);
        if let Some(program) = &self.selected_program {
            query = query.in_program(program.id.clone());
        }
        for (attribute_id, value) in &self.values {
            query = query.filter(attribute_id.clone(), value.clone());
        }
        query.query = self.query_text.clone();

        tracing::debug!(
            generation = self.latest_generation,
            filters = query.attribute_filters.len(),
            scoped = query.program.is_some(),
            "dispatching search"
        );
        self.worker
            .dispatch(SearchCommand::execute(self.latest_generation, query))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::app::view::test_support::RecordingView;
    use crate::domain::{Pager, ValueType};
    use crate::storage::{seed_demo_data, JsonStorage};
    use crate::worker::spawn_search_worker;

    fn idle_presenter() -> (tempfile::TempDir, SearchPresenter) {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("entities.json")).unwrap();
        let worker = spawn_search_worker(Box::new(storage)).unwrap();
        (dir, SearchPresenter::new(worker, 50))
    }

    fn catalog_outcome() -> SearchOutcome {
        SearchOutcome::CatalogLoaded {
            programs: vec![
                Program::new(
                    "p1",
                    "Maternal and Child Health",
                    vec!["a".to_string(), "dob".to_string()],
                ),
                Program::new("p2", "TB Control", vec!["b".to_string()]),
            ],
            attributes: vec![
                TrackedEntityAttribute::new("a", "First name", ValueType::Text),
                TrackedEntityAttribute::new("b", "Last name", ValueType::Text),
                TrackedEntityAttribute::new("dob", "Date of birth", ValueType::Date),
            ],
        }
    }

    fn envelope(total: usize) -> SearchResults {
        SearchResults {
            pager: Pager::for_total(1, 50, total),
            instances: Vec::new(),
        }
    }

    fn pump_until<F>(presenter: &mut SearchPresenter, view: &mut RecordingView, mut done: F)
    where
        F: FnMut(&RecordingView) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(view) {
            presenter.process_outcomes(view).unwrap();
            assert!(Instant::now() < deadline, "timed out waiting for outcomes");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn init_loads_the_catalog_and_runs_the_first_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("entities.json")).unwrap();
        seed_demo_data(&mut storage).unwrap();
        let worker = spawn_search_worker(Box::new(storage)).unwrap();
        let mut presenter = SearchPresenter::new(worker, 50);
        let mut view = RecordingView::new();

        presenter.init(&mut view).unwrap();
        pump_until(&mut presenter, &mut view, |v| {
            !v.program_calls.is_empty() && !v.swapped.is_empty()
        });

        assert_eq!(view.program_calls[0].len(), 3);
        assert_eq!(view.last_form().unwrap().len(), 5);
        assert_eq!(view.swapped.last().unwrap().pager.total, 8);
    }

    #[test]
    fn init_pushes_cached_catalog_before_the_worker_answers() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();
        presenter
            .on_worker_outcome(catalog_outcome(), &mut view)
            .unwrap();
        assert_eq!(view.program_calls.len(), 1);

        presenter.init(&mut view).unwrap();

        assert_eq!(view.program_calls.len(), 2);
        assert_eq!(view.form_calls.len(), 2);
    }

    #[test]
    fn superseded_results_are_dropped() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();

        presenter.search().unwrap();
        presenter.search().unwrap();
        assert_eq!(presenter.latest_generation, 2);

        presenter
            .on_worker_outcome(
                SearchOutcome::ResultsReady {
                    generation: 1,
                    results: envelope(5),
                },
                &mut view,
            )
            .unwrap();
        assert!(view.swapped.is_empty());

        presenter
            .on_worker_outcome(
                SearchOutcome::ResultsReady {
                    generation: 2,
                    results: envelope(2),
                },
                &mut view,
            )
            .unwrap();
        assert_eq!(view.swapped.len(), 1);
        assert_eq!(view.swapped[0].pager.total, 2);
    }

    #[test]
    fn scope_change_keeps_surviving_values_and_drops_the_rest() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();
        presenter
            .on_worker_outcome(catalog_outcome(), &mut view)
            .unwrap();

        presenter.set_attribute_value("a", "Awino").unwrap();
        presenter.set_attribute_value("b", "Okoth").unwrap();

        let scoped = Program::new(
            "p1",
            "Maternal and Child Health",
            vec!["a".to_string(), "dob".to_string()],
        );
        presenter.set_program(Some(scoped), &mut view).unwrap();

        let form = view.last_form().unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form[0].attribute.id, "a");
        assert_eq!(form[0].value, "Awino");

        presenter.set_program(None, &mut view).unwrap();
        let form = view.last_form().unwrap();
        assert_eq!(form.len(), 3);
        let last_name = form.iter().find(|f| f.attribute.id == "b").unwrap();
        assert!(last_name.value.is_empty());
    }

    #[test]
    fn clear_filters_blanks_the_form_and_redispatches() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();
        presenter
            .on_worker_outcome(catalog_outcome(), &mut view)
            .unwrap();
        presenter.set_attribute_value("a", "Awino").unwrap();
        presenter.set_query("okoth").unwrap();
        let generation_before = presenter.latest_generation;

        presenter.clear_filters(&mut view).unwrap();

        assert!(presenter.latest_generation > generation_before);
        let form = view.last_form().unwrap();
        assert!(form.iter().all(AttributeField::is_empty));
        assert!(presenter.query_text.is_empty());
    }

    #[test]
    fn picked_dates_become_iso_filters_and_refresh_the_form() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();
        presenter
            .on_worker_outcome(catalog_outcome(), &mut view)
            .unwrap();

        presenter.pick_date("dob", &mut view).unwrap();
        assert_eq!(view.dialogs.len(), 1);
        let dialog = view.dialogs.pop().unwrap();
        assert_eq!(dialog.label, "Date of birth");

        (dialog.listener)(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        let applied = presenter.drain_picked_dates(&mut view).unwrap();

        assert!(applied);
        let form = view.last_form().unwrap();
        let dob = form.iter().find(|f| f.attribute.id == "dob").unwrap();
        assert_eq!(dob.value, "2024-01-05");
        assert!(!presenter.drain_picked_dates(&mut view).unwrap());
    }

    #[test]
    fn current_search_failure_surfaces_a_status_and_empties_the_list() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();
        presenter.search().unwrap();

        presenter
            .on_worker_outcome(
                SearchOutcome::Failed {
                    generation: Some(presenter.latest_generation),
                    message: "could not execute search: boom".to_string(),
                },
                &mut view,
            )
            .unwrap();

        assert!(view.statuses[0].contains("could not execute search"));
        assert_eq!(view.swapped.last().unwrap().pager.total, 0);

        let swaps_before = view.swapped.len();
        presenter
            .on_worker_outcome(
                SearchOutcome::Failed {
                    generation: None,
                    message: "could not load catalog: boom".to_string(),
                },
                &mut view,
            )
            .unwrap();
        assert_eq!(view.swapped.len(), swaps_before);
        assert_eq!(view.statuses.len(), 2);
    }

    #[test]
    fn a_vanished_program_falls_back_to_the_full_catalog() {
        let (_dir, mut presenter) = idle_presenter();
        let mut view = RecordingView::new();
        presenter
            .on_worker_outcome(catalog_outcome(), &mut view)
            .unwrap();
        let scoped = Program::new("p1", "Maternal and Child Health", vec!["a".to_string()]);
        presenter.set_program(Some(scoped), &mut view).unwrap();

        presenter
            .on_worker_outcome(
                SearchOutcome::CatalogLoaded {
                    programs: vec![Program::new("p2", "TB Control", vec!["b".to_string()])],
                    attributes: vec![TrackedEntityAttribute::new(
                        "b",
                        "Last name",
                        ValueType::Text,
                    )],
                },
                &mut view,
            )
            .unwrap();

        assert!(presenter.selected_program.is_none());
        let (_, program) = view.form_calls.last().unwrap();
        assert!(program.is_none());
        assert_eq!(view.last_form().unwrap().len(), 1);
    }
}
