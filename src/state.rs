use std::sync::Arc;

use crate::data::filter::CountyFilter;
use crate::data::model::Dataset;
use crate::pipeline::classify::{classify, Classification, ClassifyError};
use crate::pipeline::facility::{ConsumptionInput, FacilitySummary};
use crate::pipeline::input::{validate_field, FieldError, NumericInput};
use crate::pipeline::metric::MetricKind;
use crate::pipeline::units::{PowerUnit, WaterUnit};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One user's selections against the shared, already-loaded dataset.
pub struct Session {
    dataset: Arc<Dataset>,

    /// Selected state, or the whole country.
    pub filter: CountyFilter,

    /// Which metric drives the map.
    pub metric: MetricKind,

    /// Raw facility fields as typed by the user.
    pub power_text: String,
    pub power_unit: PowerUnit,
    pub water_text: String,
    pub water_unit: WaterUnit,
}

/// Everything the rendering layer needs for one "make plot" action.
#[derive(Debug)]
pub enum Render {
    /// Facility fields failed validation; nothing is plotted.
    Rejected(Vec<FieldError>),
    /// The filter and cleaning left no counties to show.
    Empty(ClassifyError),
    Ready {
        classification: Classification,
        /// Present only when both facility fields were provided.
        facility: Option<FacilitySummary>,
    },
}

impl Session {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            filter: CountyFilter::WholeCountry,
            metric: MetricKind::default(),
            power_text: String::new(),
            power_unit: PowerUnit::default(),
            water_text: String::new(),
            water_unit: WaterUnit::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Validate the facility fields, classify, and normalise consumption.
    ///
    /// Classification is recomputed on every call.
    pub fn recompute(&self) -> Render {
        let power = validate_field(&self.power_text, "Power consumption");
        let water = validate_field(&self.water_text, "Water consumption");

        let (power, water) = match (power, water) {
            (Ok(p), Ok(w)) => (p, w),
            (p, w) => {
                let errors: Vec<FieldError> =
                    [p.err(), w.err()].into_iter().flatten().collect();
                for e in &errors {
                    log::warn!("{e}");
                }
                return Render::Rejected(errors);
            }
        };

        let classification = match classify(&self.dataset, self.metric, &self.filter) {
            Ok(c) => c,
            Err(e) => {
                log::info!("{e}");
                return Render::Empty(e);
            }
        };

        let facility = match (power, water) {
            (NumericInput::Value(p), NumericInput::Value(w)) => Some(FacilitySummary::new(
                ConsumptionInput {
                    value: p,
                    unit: self.power_unit,
                },
                ConsumptionInput {
                    value: w,
                    unit: self.water_unit,
                },
            )),
            _ => None,
        };

        Render::Ready {
            classification,
            facility,
        }
    }
}
