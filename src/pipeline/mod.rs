/// Metric pipeline: classification, unit conversion and input validation.
///
/// ```text
///   Dataset + MetricKind + CountyFilter
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  pair → filter → clean → p33/p66 → bucket
///   └──────────┘
///
///   raw text ──► input::validate_numeric ──► units::normalize_* ──► facility
/// ```

pub mod classify;
pub mod facility;
pub mod input;
pub mod metric;
pub mod units;

pub use classify::{classify, Classification, ClassifyError, ImpactBucket};
pub use input::{validate_numeric, InputError, NumericInput};
pub use metric::MetricKind;
pub use units::{normalize_power, normalize_water, UnitError};
