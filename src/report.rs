//! Rendering of a [`Render`] for terminals and for export.

use std::io::{self, Write};

use serde::Serialize;

use crate::color::{ansi_paint, bucket_hex};
use crate::pipeline::classify::{BucketSummary, Classification, Cutoffs};
use crate::pipeline::facility::{format_thousands, FacilitySummary};
use crate::state::Render;

// ---------------------------------------------------------------------------
// Export rows
// ---------------------------------------------------------------------------

/// One county as handed to a choropleth renderer.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    pub fips: &'a str,
    pub value: f64,
    pub formatted_value: f64,
    pub category: &'static str,
    pub color: String,
}

fn export_rows(c: &Classification) -> impl Iterator<Item = ExportRow<'_>> {
    c.records.iter().map(|r| ExportRow {
        fips: &r.county_id,
        value: r.value,
        formatted_value: r.display_value,
        category: r.bucket.label(),
        color: bucket_hex(r.bucket),
    })
}

/// A facility's annual impact if it sat at the Low or High cutoff county.
#[derive(Debug, Serialize)]
pub struct ImpactRange {
    pub low: f64,
    pub high: f64,
    pub unit: &'static str,
}

pub fn impact_range(c: &Classification, f: &FacilitySummary) -> ImpactRange {
    ImpactRange {
        low: f.annual_impact(c.cutoffs.low),
        high: f.annual_impact(c.cutoffs.high),
        unit: c.metric.annual_unit(),
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    metric: &'static str,
    unit: &'static str,
    region: String,
    cutoffs: Cutoffs,
    dropped: usize,
    summary: Vec<BucketSummary>,
    counties: Vec<ExportRow<'a>>,
    facility: Option<&'a FacilitySummary>,
    facility_impact: Option<ImpactRange>,
}

/// Write the classified counties as CSV with a header row.
pub fn write_csv<W: Write>(c: &Classification, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in export_rows(c) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full report as pretty-printed JSON.
pub fn write_json<W: Write>(
    c: &Classification,
    facility: Option<&FacilitySummary>,
    out: W,
) -> anyhow::Result<()> {
    let report = JsonReport {
        metric: c.metric.label(),
        unit: c.metric.unit(),
        region: c.filter.to_string(),
        cutoffs: c.cutoffs,
        dropped: c.dropped,
        summary: c.summary(),
        counties: export_rows(c).collect(),
        facility,
        facility_impact: facility.map(|f| impact_range(c, f)),
    };
    serde_json::to_writer_pretty(out, &report)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal report
// ---------------------------------------------------------------------------

/// Human-readable report: statistics panel, then the facility panel.
pub fn write_text<W: Write>(render: &Render, mut out: W, color: bool) -> io::Result<()> {
    match render {
        Render::Rejected(errors) => {
            for e in errors {
                writeln!(out, "Error: {e}")?;
            }
        }
        Render::Empty(e) => {
            writeln!(out, "Nothing to show: {e}.")?;
            writeln!(out, "Try another state or metric.")?;
        }
        Render::Ready {
            classification,
            facility,
        } => {
            write_statistics(classification, &mut out, color)?;
            if let Some(f) = facility {
                writeln!(out)?;
                write_facility(classification, f, &mut out)?;
            }
        }
    }
    Ok(())
}

fn write_statistics<W: Write>(c: &Classification, out: &mut W, color: bool) -> io::Result<()> {
    writeln!(out, "{} by County: {}", c.metric.title(), c.filter)?;
    writeln!(
        out,
        "{} counties classified ({}), {} without data",
        c.records.len(),
        c.metric.unit(),
        c.dropped
    )?;
    writeln!(out)?;
    writeln!(out, "Statistics")?;
    for s in c.summary() {
        let label = format!("{:<14}", s.bucket.label());
        let label = if color {
            ansi_paint(s.bucket, &label)
        } else {
            label
        };
        writeln!(out, "  {label} {:>6} counties   {}", s.count, s.range)?;
    }
    Ok(())
}

fn write_facility<W: Write>(
    c: &Classification,
    f: &FacilitySummary,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Your Facility's Impact")?;
    writeln!(
        out,
        "  Annual Power Consumption  {} kWh/year  (from {} {})",
        format_thousands(f.power_kwh_per_year),
        f.power.value,
        f.power.unit
    )?;
    writeln!(
        out,
        "  Annual Water Consumption  {} L/year  (from {} {})",
        format_thousands(f.water_liters_per_year),
        f.water.value,
        f.water.unit
    )?;
    let range = impact_range(c, f);
    writeln!(
        out,
        "  Estimated annual {}: {} - {} {} (Low to High cutoff county)",
        c.metric,
        format_thousands(range.low),
        format_thousands(range.high),
        range.unit
    )?;
    writeln!(
        out,
        "  Note: multiply annual power consumption by the county factor for your \
         facility's location to estimate its total impact."
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::model::Dataset;
    use crate::state::Session;

    fn ready_session() -> Session {
        let ds = Dataset::from_arrays(
            vec![1.0, 2.0, 3.0],
            vec![0.1, 0.2, 0.3],
            vec![4.0, 5.0, 6.0],
            vec![1001.0, 1003.0, 1005.0],
        )
        .unwrap();
        Session::new(Arc::new(ds))
    }

    fn classification(s: &Session) -> Classification {
        match s.recompute() {
            Render::Ready { classification, .. } => classification,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn text_report_has_statistics_and_facility() {
        let mut s = ready_session();
        s.power_text = "5".into();
        s.power_unit = "kW".parse().unwrap();
        s.water_text = "10".into();

        let mut buf = Vec::new();
        write_text(&s.recompute(), &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Carbon Footprint by County: USA"));
        assert!(text.contains("Low Impact"));
        assert!(text.contains("≤ 0.1660"));
        assert!(text.contains("43,800 kWh/year"));
        assert!(text.contains("(from 5 kW)"));
        assert!(text.contains("10 L/year"));
        // 43,800 kWh/year at the 0.166 and 0.232 cutoffs.
        assert!(text.contains("Estimated annual carbon footprint: 7,271 - 10,162 kg CO2e/year"));
    }

    #[test]
    fn negative_zero_input_prints_as_zero() {
        let mut s = ready_session();
        s.power_text = "-0".into();
        s.power_unit = "kW".parse().unwrap();
        s.water_text = "-0".into();
        let mut buf = Vec::new();
        write_text(&s.recompute(), &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("(from 0 kW)"));
        assert!(!text.contains("-0"));
    }

    #[test]
    fn rejected_and_empty_renders() {
        let mut s = ready_session();
        s.power_text = "abc".into();
        let mut buf = Vec::new();
        write_text(&s.recompute(), &mut buf, false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Error: Power consumption must be a valid number\n"
        );

        s.power_text.clear();
        s.filter = crate::data::filter::CountyFilter::from_selector("Maine").unwrap();
        let mut buf = Vec::new();
        write_text(&s.recompute(), &mut buf, false).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("Nothing to show"));
    }

    #[test]
    fn csv_export_rows() {
        let s = ready_session();
        let mut buf = Vec::new();
        write_csv(&classification(&s), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "fips,value,formatted_value,category,color");
        assert_eq!(lines[1], "01001,0.1,0.1,Low Impact,#2E8B57");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn json_export_structure() {
        let s = ready_session();
        let mut buf = Vec::new();
        write_json(&classification(&s), None, &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["metric"], "carbon footprint");
        assert_eq!(v["region"], "USA");
        assert_eq!(v["counties"].as_array().unwrap().len(), 3);
        assert_eq!(v["counties"][2]["category"], "High Impact");
        assert!(v["facility"].is_null());
        assert_eq!(v["summary"][0]["bucket"], "Low");
        assert!(v["facility_impact"].is_null());
    }

    #[test]
    fn json_export_includes_facility_impact() {
        let mut s = ready_session();
        s.power_text = "1000".into();
        s.water_text = "1".into();
        let (c, f) = match s.recompute() {
            Render::Ready {
                classification,
                facility: Some(f),
            } => (classification, f),
            other => panic!("unexpected {other:?}"),
        };
        let mut buf = Vec::new();
        write_json(&c, Some(&f), &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let impact = &v["facility_impact"];
        assert_eq!(impact["unit"], "kg CO2e/year");
        assert!((impact["low"].as_f64().unwrap() - 166.0).abs() < 1e-6);
        assert!((impact["high"].as_f64().unwrap() - 232.0).abs() < 1e-6);
    }
}
