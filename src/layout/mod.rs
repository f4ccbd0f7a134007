//! Grid-based block layout
//!
//! Blocks live in a [`LayoutStore`]. New ones are placed by [`Placement`]
//! and a resized block pushes its neighbours out of the way through the
//! [`Resolver`]. The [`Engine`] runs parsed scripts against a store.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod lint;
pub mod placement;
pub mod resolver;
pub mod store;
pub mod types;

pub use config::{ConfigError, LayoutConfig, NegativeFace, ShrinkPolicy};
pub use engine::{CommandError, CommandReport, Engine};
pub use error::LayoutError;
pub use geometry::{is_directly_above, is_flush_against, is_touching_front, is_touching_right, overlaps, Bounds};
pub use lint::{LintCategory, LintWarning};
pub use placement::Placement;
pub use resolver::{Resolution, Resolver};
pub use store::LayoutStore;
pub use types::*;
