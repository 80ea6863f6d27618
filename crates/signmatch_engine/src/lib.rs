//! # Signmatch Engine (`signmatch_engine`)
//!
//! ## Purpose
//!
//! `signmatch_engine` sits on top of the data model (`signmatch_grid`) and
//! the string-search layer (`signmatch_words`). It runs the template
//! matching pass, aggregates per-placement outcomes, maintains the spatial
//! partition structures, and drives the word relation search.
//!
//! In a typical flow you will:
//! - Build a subject [`Map`](signmatch_grid::Map) and a candidate
//!   [`MapSet`](signmatch_grid::MapSet) from already-quantized sign values.
//! - Run [`MatchAgainst::match_against`] to produce a [`SearchResults`]
//!   grid.
//! - Build a [`Region`] over the result grid and populate it with
//!   [`SearchResults::fill_region`]; optionally re-project the findings
//!   onto points with an [`Attacher`].
//! - Ask [`SearchResults::find_relation`] which target words the discovered
//!   tags can spell.
//!
//! ## Core Types
//!
//! - [`MatchAgainst`]: the matching seam, with a pure and a destructive
//!   entry point.
//! - [`SearchResults`] / [`ResultCell`]: per-placement winning percentage
//!   and tied candidates.
//! - [`Region`] / [`Rect`] / [`Registered`] / [`Reg`]: disjoint-rectangle
//!   partition with per-rectangle best candidates.
//! - [`Attacher`] / [`AttachedPoint`]: point-to-rectangle binding.
//! - [`EngineError`]: the crate's typed error surface.
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-pass latency and sizes; `tracing` spans wrap every matching
//! pass and relation search.

mod attacher;
mod engine;
mod metrics;
mod region;
mod relation;
mod results;
mod types;

pub use crate::attacher::{AttachedPoint, Attacher};
pub use crate::engine::MatchAgainst;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::region::{Rect, Reg, Region, Registered};
pub use crate::results::{ResultCell, SearchResults};
pub use crate::types::{EngineError, DIFF_EQUAL};
