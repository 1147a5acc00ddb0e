//! Composable UI component renderers.
//!
//! This module provides specialized rendering components for different UI
//! elements, following a component-based architecture. Each component is
//! responsible for rendering a specific part of the interface into the area
//! the renderer assigns to it.
//!
//! # Components
//!
//! - [`header`]: Title bar with the active program scope
//! - [`query`]: Free-text query input box
//! - [`selector`]: Program scope selector (collapsed or expanded)
//! - [`form`]: Dynamic attribute form rows
//! - [`results`]: Result counter and inline preview table
//! - [`empty`]: Empty state message before a catalog loads
//! - [`footer`]: Keybinding hints and status messages
//! - [`datepicker`]: Modal date picker overlay

mod datepicker;
mod empty;
mod footer;
mod form;
mod header;
mod query;
mod results;
mod selector;

pub use datepicker::render_date_picker;
pub use empty::render_empty_state;
pub use footer::render_footer;
pub use form::render_form;
pub use header::render_header;
pub use query::render_query_bar;
pub use results::render_results;
pub use selector::render_selector;
