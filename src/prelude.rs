//! Convenience re-exports of commonly used types.
//!
//! `use egot::prelude::*;` brings in the options, the API client and the search and detail
//! types.

pub use crate::api::Resource;
pub use crate::detail::{LOADING_MESSAGES, SLOW_HINT};
pub use crate::options::{EgotOptions, EgotOptionsBuilder, Mode};
pub use crate::search::{Effect, Phase, SearchKey};
pub use crate::*;
