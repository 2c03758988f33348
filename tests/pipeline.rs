//! End-to-end: load a dataset file, classify it, normalise facility inputs.

use std::path::PathBuf;
use std::sync::Arc;

use impact_explorer::data::filter::CountyFilter;
use impact_explorer::state::{Render, Session};
use impact_explorer::{
    classify, load, normalize_power, normalize_water, validate_numeric, ClassifyError,
    ImpactBucket, InputError, LoadError, MetricKind, NumericInput,
};

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "impact-explorer-it-{}-{name}",
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

const COUNTIES_CSV: &str = "\
CountyFIPS,AWAREUSCF,EFkgkWh,EWIF
1001,12.0,0.61,1.9
1003,9.5,0.58,
1005,0,0.66,2.4
6037,40.1,0.22,3.1
6059,35.2,0.21,2.9
6073,51.0,0.24,3.3
6075,28.4,0.19,2.7
17031,3.2,0.45,1.1
";

#[test]
fn csv_dataset_through_the_whole_pipeline() {
    let path = write_fixture("counties.csv", COUNTIES_CSV);
    let dataset = load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(dataset.len(), 8);

    let california = CountyFilter::from_selector("CA").unwrap();
    let c = classify(&dataset, MetricKind::WaterScarcityFootprint, &california).unwrap();
    let ids: Vec<&str> = c.records.iter().map(|r| r.county_id.as_str()).collect();
    assert_eq!(ids, vec!["06037", "06059", "06073", "06075"]);
    assert!(c.cutoffs.low <= c.cutoffs.high);
    assert_eq!(c.records[2].bucket, ImpactBucket::High);
    assert_eq!(c.records[3].bucket, ImpactBucket::Low);

    // The zero sentinel for 01005 drops out of the national scarcity view.
    let national =
        classify(&dataset, MetricKind::WaterScarcityFootprint, &CountyFilter::WholeCountry)
            .unwrap();
    assert_eq!(national.records.len(), 7);
    assert_eq!(national.dropped, 1);

    // The empty EWIF cell for 01003 is missing data.
    let alabama = CountyFilter::from_selector("Alabama").unwrap();
    let water = classify(&dataset, MetricKind::WaterFootprint, &alabama).unwrap();
    assert_eq!(water.records.len(), 2);
}

#[test]
fn shared_dataset_serves_independent_sessions() {
    let path = write_fixture("shared.csv", COUNTIES_CSV);
    let dataset = Arc::new(load(&path).unwrap());
    std::fs::remove_file(&path).ok();

    let mut texas = Session::new(Arc::clone(&dataset));
    texas.filter = CountyFilter::from_selector("Texas").unwrap();
    assert!(matches!(
        texas.recompute(),
        Render::Empty(ClassifyError::EmptyResult { .. })
    ));

    let mut illinois = Session::new(Arc::clone(&dataset));
    illinois.filter = CountyFilter::from_selector("IL").unwrap();
    illinois.power_text = "1.5".into();
    illinois.power_unit = "MW".parse().unwrap();
    illinois.water_text = "0".into();
    match illinois.recompute() {
        Render::Ready {
            classification,
            facility: Some(f),
        } => {
            assert_eq!(classification.records.len(), 1);
            assert_eq!(classification.records[0].bucket, ImpactBucket::Low);
            assert_eq!(f.power_kwh_per_year, 1.5 * 1000.0 * 8760.0);
            assert_eq!(f.water_liters_per_year, 0.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn load_errors_are_typed() {
    assert!(matches!(
        load(std::path::Path::new("no/such/CountyLevelMetrics.mat")),
        Err(LoadError::FileNotFound(_))
    ));

    let path = write_fixture(
        "no-fips.csv",
        "AWAREUSCF,EFkgkWh,EWIF\n1.0,0.5,2.0\n",
    );
    let err = load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, LoadError::Schema(_)));
}

#[test]
fn conversions_and_validation() {
    assert_eq!(normalize_power(5.0, "kW").unwrap(), 43_800.0);
    assert_eq!(normalize_water(2.0, "gpm").unwrap(), 2.0 * 525_600.0 * 3.78541);
    assert!(normalize_power(5.0, "hp").is_err());

    assert_eq!(validate_numeric(""), Ok(NumericInput::NotProvided));
    assert_eq!(validate_numeric("0"), Ok(NumericInput::Value(0.0)));
    assert!(matches!(validate_numeric("-3"), Err(InputError::Negative(_))));
    assert!(matches!(validate_numeric("abc"), Err(InputError::NotANumber(_))));
}
