//! County-level environmental impact explorer.
//!
//! The crate loads a table of per-county carbon intensity, water intensity and
//! water scarcity factors, classifies counties into Low / Medium / High impact
//! by percentile, and normalises a facility's power and water consumption to
//! annual figures. Rendering is left to the caller; [`report`] provides a
//! terminal report and CSV/JSON export.

pub mod color;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod state;

pub use data::loader::{load_file as load, LoadError};
pub use data::model::{CountyRecord, Dataset};
pub use pipeline::{
    classify, normalize_power, normalize_water, validate_numeric, Classification, ClassifyError,
    ImpactBucket, InputError, MetricKind, NumericInput, UnitError,
};
