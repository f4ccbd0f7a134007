//! Block Layout - grid-based 3D box layout with overlap resolution
//!
//! Blocks are axis-aligned cuboids on a unit grid. When a block is resized,
//! the blocks resting against its grown faces are pushed along, and the push
//! propagates through chains of touching blocks.
//!
//! # Example
//!
//! ```rust
//! use block_layout::run_script;
//!
//! let outcome = run_script(r#"
//!     block a at (0, 0, 0)
//!     block b at (0, 1, 0)
//!     resize a height 2
//! "#).unwrap();
//!
//! assert_eq!(outcome.layout.get(&"b".into()).unwrap().position.y, 2.0);
//! ```

pub mod error;
pub mod layout;
pub mod parser;
pub mod snapshot;

pub use error::ParseError;
pub use layout::{
    CommandError, CommandReport, Engine, LayoutConfig, LayoutError, LayoutStore, LintWarning,
    Placement, Resolution, Resolver,
};
pub use parser::{parse, Script};
pub use snapshot::LayoutSnapshot;

use thiserror::Error;

/// Errors that can occur while running a script
#[derive(Debug, Error)]
pub enum RunError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// A command could not be applied
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

impl From<Vec<ParseError>> for RunError {
    fn from(errors: Vec<ParseError>) -> Self {
        RunError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for a script run
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Tolerances and resolver settings
    pub layout: LayoutConfig,
    /// Run lint checks on the final layout
    pub lint: bool,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    pub fn with_lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }
}

/// Final layout plus what each command did
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub layout: LayoutStore,
    pub reports: Vec<CommandReport>,
    /// Empty unless lint was enabled
    pub warnings: Vec<LintWarning>,
}

/// Run a script against an empty layout with default configuration
pub fn run_script(source: &str) -> Result<RunOutcome, RunError> {
    run_script_with_config(source, &RunConfig::default())
}

/// Run a script against an empty layout
///
/// # Example
///
/// ```rust
/// use block_layout::{run_script_with_config, LayoutConfig, RunConfig};
///
/// let config = RunConfig::new()
///     .with_layout(LayoutConfig::default().with_max_iterations(3))
///     .with_lint(true);
///
/// let outcome = run_script_with_config("add at (0, 2, 0)", &config).unwrap();
/// assert_eq!(outcome.warnings.len(), 1);
/// ```
pub fn run_script_with_config(source: &str, config: &RunConfig) -> Result<RunOutcome, RunError> {
    let script = parse(source)?;
    let mut store = LayoutStore::new();
    run_on(&mut store, &script, config).map(|(reports, warnings)| RunOutcome {
        layout: store,
        reports,
        warnings,
    })
}

/// Run a parsed script against an existing layout
pub fn run_on(
    store: &mut LayoutStore,
    script: &Script,
    config: &RunConfig,
) -> Result<(Vec<CommandReport>, Vec<LintWarning>), RunError> {
    let reports = Engine::new(&config.layout).execute(store, script)?;
    let warnings = if config.lint {
        layout::lint::check(store, &config.layout)
    } else {
        Vec::new()
    };
    Ok((reports, warnings))
}
