//! Application layer coordinating state, events, the presenter, and actions.
//!
//! This module defines the core application logic layer, sitting between the
//! terminal runtime (main.rs) and the domain/storage/worker layers. It
//! implements the presenter-driven architecture that powers the search
//! screen.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions
//!                                                            │
//!                 SearchView pushes ← SearchPresenter ←──────┘
//!                 (set_form, set_programs,    │  ^
//!                  swap_data, show_date_dialog)  │
//!                                     commands │ │ outcomes
//!                                              v │
//!                                         worker thread
//! ```
//!
//! The handler mutates view-local state and emits [`Action`]s; the runtime
//! routes those to [`SearchPresenter`], which owns the authoritative filter
//! state and pushes complete models back into [`AppState`] through the
//! [`SearchView`] trait.
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Panel focus state machine types
//! - [`presenter`]: Filter state, worker dispatch, and view pushes
//! - [`state`]: Central application state container and view model
//!   computation
//! - [`view`]: The presenter/view contract and its list building blocks
//!
//! # Example
//!
//! ```rust
//! use teisearch::app::{handle_event, AppState, Event};
//! use teisearch::ui::theme::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::FocusNext)?;
//! assert!(render && actions.is_empty());
//! # Ok::<(), teisearch::domain::TeiSearchError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod presenter;
pub mod state;
pub mod view;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::Focus;
pub use presenter::SearchPresenter;
pub use state::AppState;
pub use view::{
    Binding, DateDialogRequest, DateListener, DateOverlay, DateSegment, ProgramSelect,
    RenderableList, RowList, SearchView, INLINE_PREVIEW_MAX, PROGRAM_PLACEHOLDER,
};
