use std::collections::BTreeSet;
use std::fmt;

use super::states::{self, UsState};

// ---------------------------------------------------------------------------
// County filter: which counties take part in a classification
// ---------------------------------------------------------------------------

/// Restricts the dataset to a set of counties before classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CountyFilter {
    /// Every county in the dataset.
    #[default]
    WholeCountry,
    /// Counties whose FIPS identifier starts with the state's code.
    State(UsState),
    /// An explicit set of 5-digit county identifiers.
    Counties(BTreeSet<String>),
}

impl CountyFilter {
    /// Parse a state selector: `USA` (or empty) for the whole country,
    /// otherwise a state name or postal abbreviation.
    pub fn from_selector(selector: &str) -> Option<Self> {
        let s = selector.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("USA") || s.eq_ignore_ascii_case("US") {
            return Some(CountyFilter::WholeCountry);
        }
        states::lookup(s).map(CountyFilter::State)
    }

    /// Whether `county_id` passes the filter.
    pub fn matches(&self, county_id: &str) -> bool {
        match self {
            CountyFilter::WholeCountry => true,
            CountyFilter::State(state) => county_id.starts_with(state.fips),
            CountyFilter::Counties(ids) => ids.contains(county_id),
        }
    }
}

impl fmt::Display for CountyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountyFilter::WholeCountry => write!(f, "USA"),
            CountyFilter::State(state) => write!(f, "{state}"),
            CountyFilter::Counties(ids) => write!(f, "{} selected counties", ids.len()),
        }
    }
}
