#![forbid(unsafe_code)]
//! retab-ops: the operation contract, registry, parameter validation, and the
//! remodeling operation catalog.
//!
//! Design:
//! - `params` is a small declarative schema language: every operation kind
//!   publishes a `&'static ParamSchema`, and validation reports *all*
//!   violations rather than stopping at the first.
//! - `op` holds the polymorphic contract (`Operation`, `Summarizer`) and the
//!   runtime error type for preconditions a schema cannot check up front.
//! - `registry` is a closed tag set (`OperationKind`): resolving a name and
//!   constructing an instance are total over the enum, so adding a kind means
//!   adding a variant plus its match arms.
//! - One module per operation; summarizers live under `summarize/`.

pub mod op;
pub mod params;
pub mod registry;

pub mod factor_column;
pub mod merge_consecutive;
pub mod number_rows;
pub mod remap_columns;
pub mod remove_columns;
pub mod remove_rows;
pub mod rename_columns;
pub mod reorder_columns;
pub mod split_rows;
pub mod summarize;

pub use op::{InvalidParameters, OpError, Operation, Summarizer, SummaryReport};
pub use params::{CrossCheck, FieldSpec, ParamKind, ParamSchema, Violation};
pub use registry::{names, resolve, OperationKind, UnknownOperation};

/// Column that anchors event timing in event files.
pub const ONSET_COLUMN: &str = "onset";

/// Column that carries event durations in event files.
pub const DURATION_COLUMN: &str = "duration";
