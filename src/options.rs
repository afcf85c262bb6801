//! Configuration options for egot.
//!
//! [`EgotOptions`] carries everything the library needs from the outside world: the API base url
//! and the interaction timings. Nothing in the library reads the environment; the binary fills
//! these from the command line (and `EGOT_API_URL`).

use std::time::Duration;

use derive_builder::Builder;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// egot - track the road to EGOT
///
/// Search celebrities and see which of the Emmy, Grammy, Oscar and Tony they have won.
/// Without a name or listing flag, an interactive search is started.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "egot", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct EgotOptions {
    //  --- Lookup ---
    /// Celebrity to look up
    ///
    /// Skips the interactive search and prints the celebrity's EGOT status and awards
    #[cfg_attr(feature = "cli", arg(help_heading = "Lookup"))]
    #[builder(setter(into, strip_option))]
    pub name: Option<String>,

    /// List celebrities one award away from an EGOT
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Lookup"))]
    pub close_to_egot: bool,

    /// List EGOT winners
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Lookup"))]
    pub egot_winners: bool,

    /// List celebrities without any win
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Lookup"))]
    pub no_awards: bool,

    /// Show the Oscar race of the given year
    #[cfg_attr(feature = "cli", arg(long, value_name = "YEAR", help_heading = "Lookup"))]
    #[builder(setter(strip_option))]
    pub oscar_race: Option<i32>,

    /// List the years with a recorded Oscar ceremony
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Lookup"))]
    pub oscar_years: bool,

    /// Maximum number of celebrities in a listing
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Lookup"))]
    #[builder(setter(strip_option))]
    pub limit: Option<usize>,

    /// Check that the API is reachable and exit
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Lookup"))]
    pub check: bool,

    //  --- Search ---
    /// Delay after the last keystroke before suggestions are fetched, in milliseconds
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 200, help_heading = "Search"))]
    pub debounce_ms: u64,

    /// Minimum number of characters (ignoring surrounding spaces) before suggestions are fetched
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 2, help_heading = "Search"))]
    pub min_query_length: usize,

    /// Initial query of the interactive search
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Search"))]
    #[builder(setter(into, strip_option))]
    pub query: Option<String>,

    /// Print the submitted query on exit
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Search"))]
    pub print_query: bool,

    /// Disable mouse
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Search"))]
    pub no_mouse: bool,

    //  --- API ---
    /// Base url of the EGOT API
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "EGOT_API_URL", default_value = DEFAULT_API_URL, help_heading = "API")
    )]
    #[builder(setter(into))]
    pub api_url: String,

    /// Give up on a celebrity lookup after this many seconds
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 30, help_heading = "API"))]
    pub request_timeout_secs: u64,

    /// Interval between loading messages, in milliseconds
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 2000, help_heading = "API"))]
    pub loading_interval_ms: u64,
}

impl Default for EgotOptions {
    fn default() -> Self {
        Self {
            name: None,
            close_to_egot: false,
            egot_winners: false,
            no_awards: false,
            oscar_race: None,
            oscar_years: false,
            limit: None,
            check: false,
            debounce_ms: 200,
            min_query_length: 2,
            query: None,
            print_query: false,
            no_mouse: false,
            api_url: String::from(DEFAULT_API_URL),
            request_timeout_secs: 30,
            loading_interval_ms: 2000,
        }
    }
}

/// What the binary has been asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Interactive search
    Search,
    /// Look a single celebrity up
    Lookup(String),
    /// Celebrities with three of four
    CloseToEgot,
    /// Celebrities with all four
    EgotWinners,
    /// Celebrities without wins
    NoAwards,
    /// An Oscar ceremony
    OscarRace(i32),
    /// Years with a ceremony
    OscarYears,
    /// API health check
    Check,
}

/// Invalid option combinations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OptionsError {
    /// More than one of the lookup modes was requested
    #[error("Conflicting modes: {0} and {1}")]
    ConflictingModes(&'static str, &'static str),
    /// A zero limit would always list nothing
    #[error("Limit must be greater than 0")]
    ZeroLimit,
    /// The name is blank
    #[error("Celebrity name is empty")]
    EmptyName,
    /// Loading messages need a non-zero period
    #[error("Loading interval must be greater than 0")]
    ZeroLoadingInterval,
}

impl EgotOptionsBuilder {
    /// Builds the EgotOptions from the builder
    pub fn build(&mut self) -> Result<EgotOptions, EgotOptionsBuilderError> {
        self.final_build()
    }
}

impl EgotOptions {
    /// Debounce delay of the autocomplete
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Bound on the celebrity lookup
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Interval between loading messages
    pub fn loading_interval(&self) -> Duration {
        Duration::from_millis(self.loading_interval_ms)
    }

    /// Resolve the requested mode, rejecting combinations that make no sense
    pub fn mode(&self) -> Result<Mode, OptionsError> {
        if self.limit == Some(0) {
            return Err(OptionsError::ZeroLimit);
        }
        if self.loading_interval_ms == 0 {
            return Err(OptionsError::ZeroLoadingInterval);
        }
        let mut requested: Vec<(&'static str, Mode)> = Vec::new();
        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(OptionsError::EmptyName);
            }
            requested.push(("NAME", Mode::Lookup(name.to_string())));
        }
        if self.close_to_egot {
            requested.push(("--close-to-egot", Mode::CloseToEgot));
        }
        if self.egot_winners {
            requested.push(("--egot-winners", Mode::EgotWinners));
        }
        if self.no_awards {
            requested.push(("--no-awards", Mode::NoAwards));
        }
        if let Some(year) = self.oscar_race {
            requested.push(("--oscar-race", Mode::OscarRace(year)));
        }
        if self.oscar_years {
            requested.push(("--oscar-years", Mode::OscarYears));
        }
        if self.check {
            requested.push(("--check", Mode::Check));
        }
        match requested.as_slice() {
            [] => Ok(Mode::Search),
            [(_, mode)] => Ok(mode.clone()),
            [(a, _), (b, _), ..] => Err(OptionsError::ConflictingModes(a, b)),
        }
    }
}
