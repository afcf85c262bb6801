//! egot tracks celebrities' progress toward the EGOT: an Emmy, a Grammy, an Oscar and a Tony.
//!
//! The data comes from a remote HTTP API ([`api::HttpApi`]). On top of it the crate provides a
//! debounced, race-safe search interaction ([`search`]), the aggregation turning a flat award
//! list into an EGOT status and grouped views ([`aggregate`]), and an interactive terminal
//! front-end ([`tui`]).
//!
//! # Examples
//!
//! ```no_run
//! use egot::prelude::*;
//!
//! let options = EgotOptionsBuilder::default()
//!     .api_url("http://localhost:8080")
//!     .build()
//!     .unwrap();
//!
//! let output = Egot::run_with(&options).unwrap();
//! if let Some(navigation) = output.navigation {
//!     println!("last visited {}", navigation.name());
//! }
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

use color_eyre::eyre::Result;

pub use crate::aggregate::{
    AwardGroups, EgotProgress, EgotStatus, compute_egot_status, find_missing_award, group_awards_by_type,
};
pub use crate::api::{ApiError, CelebrityApi, HttpApi};
pub use crate::detail::{DetailPage, DetailState, LoadingProgress};
pub use crate::model::{Award, AwardType, Celebrity, Suggestion};
pub use crate::options::EgotOptions;
pub use crate::search::{Navigation, SearchController, SearchEvent, SearchSession};
pub use crate::tui::TuiOutput;

pub mod aggregate;
pub mod api;
pub mod detail;
pub mod model;
pub mod options;
pub mod prelude;
pub mod report;
pub mod search;
pub mod tui;

/// Entry point of the interactive front-end
pub struct Egot {}

impl Egot {
    /// Run the interactive search against the API configured in `options`.
    ///
    /// Blocks until the user quits. Creates its own tokio runtime, so it must not be called
    /// from within one.
    pub fn run_with(options: &EgotOptions) -> Result<TuiOutput> {
        let client = HttpApi::from_options(options)?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(tui::run(options, &client))
    }
}
