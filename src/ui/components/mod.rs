//! UI components module.

pub mod collect;
pub mod details;
pub mod results;

pub use collect::{render_collect, CollectState};
pub use details::{render_details, DetailsState};
pub use results::{render_results, ResultsState};
