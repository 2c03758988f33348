use std::fmt;

use serde::Serialize;

/// A U.S. state (or the District of Columbia) and its 2-digit FIPS code.
///
/// County FIPS identifiers start with the state code, so `06037` is a
/// county in California (`06`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UsState {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub fips: &'static str,
}

impl fmt::Display for UsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

const fn st(name: &'static str, abbreviation: &'static str, fips: &'static str) -> UsState {
    UsState {
        name,
        abbreviation,
        fips,
    }
}

/// All selectable states, alphabetical by name.
pub const STATES: [UsState; 51] = [
    st("Alabama", "AL", "01"),
    st("Alaska", "AK", "02"),
    st("Arizona", "AZ", "04"),
    st("Arkansas", "AR", "05"),
    st("California", "CA", "06"),
    st("Colorado", "CO", "08"),
    st("Connecticut", "CT", "09"),
    st("Delaware", "DE", "10"),
    st("District of Columbia", "DC", "11"),
    st("Florida", "FL", "12"),
    st("Georgia", "GA", "13"),
    st("Hawaii", "HI", "15"),
    st("Idaho", "ID", "16"),
    st("Illinois", "IL", "17"),
    st("Indiana", "IN", "18"),
    st("Iowa", "IA", "19"),
    st("Kansas", "KS", "20"),
    st("Kentucky", "KY", "21"),
    st("Louisiana", "LA", "22"),
    st("Maine", "ME", "23"),
    st("Maryland", "MD", "24"),
    st("Massachusetts", "MA", "25"),
    st("Michigan", "MI", "26"),
    st("Minnesota", "MN", "27"),
    st("Mississippi", "MS", "28"),
    st("Missouri", "MO", "29"),
    st("Montana", "MT", "30"),
    st("Nebraska", "NE", "31"),
    st("Nevada", "NV", "32"),
    st("New Hampshire", "NH", "33"),
    st("New Jersey", "NJ", "34"),
    st("New Mexico", "NM", "35"),
    st("New York", "NY", "36"),
    st("North Carolina", "NC", "37"),
    st("North Dakota", "ND", "38"),
    st("Ohio", "OH", "39"),
    st("Oklahoma", "OK", "40"),
    st("Oregon", "OR", "41"),
    st("Pennsylvania", "PA", "42"),
    st("Rhode Island", "RI", "44"),
    st("South Carolina", "SC", "45"),
    st("South Dakota", "SD", "46"),
    st("Tennessee", "TN", "47"),
    st("Texas", "TX", "48"),
    st("Utah", "UT", "49"),
    st("Vermont", "VT", "50"),
    st("Virginia", "VA", "51"),
    st("Washington", "WA", "53"),
    st("West Virginia", "WV", "54"),
    st("Wisconsin", "WI", "55"),
    st("Wyoming", "WY", "56"),
];

/// Find a state by full name (case-insensitive) or postal abbreviation.
pub fn lookup(query: &str) -> Option<UsState> {
    let q = query.trim();
    STATES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(q) || s.abbreviation.eq_ignore_ascii_case(q))
        .copied()
}
