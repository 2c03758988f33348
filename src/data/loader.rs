use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use matfile::{MatFile, NumericData};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    ARRAY_NAMES, CARBON_INTENSITY_ARRAY, COUNTY_FIPS_ARRAY, Dataset, WATER_INTENSITY_ARRAY,
    WATER_SCARCITY_ARRAY,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load failures. Every variant is fatal for the session: no partial
/// dataset is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("data file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("dataset schema error: {0}")]
    Schema(String),

    #[error("could not read '{}': {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

fn unreadable(path: &Path, err: impl std::fmt::Display) -> LoadError {
    LoadError::Unreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Named arrays pulled from a container before they are checked and joined.
type ArrayTable = BTreeMap<&'static str, Vec<f64>>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the county metrics dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.mat`     – MATLAB Level 5 file holding the four arrays as matrices
/// * `.parquet` – one numeric column per array
/// * `.json`    – `{ "AWAREUSCF": [...], "EFkgkWh": [...], ... }`
/// * `.csv`     – header row naming the four columns
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "mat" => load_mat(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = assemble(table)?;
    log::info!(
        "Loaded {} counties from {} (.{ext})",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Check that every array is present and join them into a [`Dataset`].
fn assemble(mut table: ArrayTable) -> Result<Dataset, LoadError> {
    let mut take = |name: &'static str| {
        table
            .remove(name)
            .ok_or_else(|| LoadError::Schema(format!("missing array '{name}'")))
    };
    let water_scarcity = take(WATER_SCARCITY_ARRAY)?;
    let carbon_intensity = take(CARBON_INTENSITY_ARRAY)?;
    let water_intensity = take(WATER_INTENSITY_ARRAY)?;
    let county_fips = take(COUNTY_FIPS_ARRAY)?;
    Dataset::from_arrays(water_scarcity, carbon_intensity, water_intensity, county_fips)
}

// ---------------------------------------------------------------------------
// MATLAB loader
// ---------------------------------------------------------------------------

/// The published dataset stores each array as an N×1 double matrix.
/// Any numeric class is accepted as long as the matrix is a vector.
fn load_mat(path: &Path) -> Result<ArrayTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| unreadable(path, e))?;
    let mat = MatFile::parse(file).map_err(|e| unreadable(path, format!("{e:?}")))?;

    let mut table = ArrayTable::new();
    for name in ARRAY_NAMES {
        let Some(array) = mat.find_by_name(name) else {
            continue;
        };
        let dims = array.size();
        if dims.iter().filter(|&&d| d > 1).count() > 1 {
            return Err(LoadError::Schema(format!(
                "array '{name}' has shape {dims:?}, expected a vector"
            )));
        }
        let values = mat_numeric_values(array.data())
            .ok_or_else(|| LoadError::Schema(format!("array '{name}' is not numeric")))?;
        table.insert(name, values);
    }
    Ok(table)
}

/// Flatten the real part of a MATLAB numeric array to `f64`.
fn mat_numeric_values(data: &NumericData) -> Option<Vec<f64>> {
    fn widen<T: Copy + Into<f64>>(v: &[T]) -> Vec<f64> {
        v.iter().map(|&x| x.into()).collect()
    }

    #[allow(unreachable_patterns)]
    let values = match data {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => widen(real),
        NumericData::Int8 { real, .. } => widen(real),
        NumericData::UInt8 { real, .. } => widen(real),
        NumericData::Int16 { real, .. } => widen(real),
        NumericData::UInt16 { real, .. } => widen(real),
        NumericData::Int32 { real, .. } => widen(real),
        NumericData::UInt32 { real, .. } => widen(real),
        NumericData::Int64 { real, .. } => real.iter().map(|&x| x as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&x| x as f64).collect(),
        _ => return None,
    };
    Some(values)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one numeric column per array name.
///
/// Integer, float and decimal columns are cast to `Float64`; nulls become NaN
/// so the classifier's cleaning step drops them. Any other column type is a
/// schema error.
fn load_parquet(path: &Path) -> Result<ArrayTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| unreadable(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .and_then(|builder| builder.build())
        .map_err(|e| unreadable(path, e))?;

    let mut table = ArrayTable::new();
    let mut seen_batch = false;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| unreadable(path, e))?;
        let schema = batch.schema();

        for name in ARRAY_NAMES {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::Schema(format!("missing array '{name}'")))?;
            let raw = batch.column(idx);
            // A safe cast would turn text into nulls, hiding the schema problem.
            if !raw.data_type().is_numeric() {
                return Err(LoadError::Schema(format!(
                    "column '{name}' has type {}, expected a numeric type",
                    raw.data_type()
                )));
            }
            let as_f64 = cast(raw, &DataType::Float64).map_err(|e| {
                LoadError::Schema(format!("column '{name}' is not numeric: {e}"))
            })?;
            let column = as_f64
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| LoadError::Schema(format!("column '{name}' is not numeric")))?;

            table
                .entry(name)
                .or_default()
                .extend(column.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        seen_batch = true;
    }

    // A file with a schema but no row groups still has to name the columns.
    if !seen_batch {
        let file = std::fs::File::open(path).map_err(|e| unreadable(path, e))?;
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| unreadable(path, e))?;
        for name in ARRAY_NAMES {
            if builder.schema().index_of(name).is_ok() {
                table.insert(name, Vec::new());
            }
        }
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (column-oriented, `df.to_json(orient='list')`):
///
/// ```json
/// {
///   "AWAREUSCF":  [1.2, 0.8, ...],
///   "EFkgkWh":    [0.41, 0.52, ...],
///   "EWIF":       [2.1, 1.7, ...],
///   "CountyFIPS": [1001, 1003, ...]
/// }
/// ```
fn load_json(path: &Path) -> Result<ArrayTable, LoadError> {
    let root: JsonValue = std::fs::read_to_string(path)
        .context("reading JSON file")
        .and_then(|text| serde_json::from_str(&text).context("parsing JSON"))
        .map_err(|e| unreadable(path, format!("{e:#}")))?;

    let object = root
        .as_object()
        .ok_or_else(|| LoadError::Schema("expected a top-level JSON object".into()))?;

    let mut table = ArrayTable::new();
    for name in ARRAY_NAMES {
        let Some(value) = object.get(name) else {
            continue;
        };
        let items = value
            .as_array()
            .ok_or_else(|| LoadError::Schema(format!("'{name}' is not an array")))?;
        let values = items
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                JsonValue::Null => Ok(f64::NAN),
                other => other
                    .as_f64()
                    .ok_or_else(|| LoadError::Schema(format!("{name}[{i}]: not a number"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        table.insert(name, values);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the four array names, one county per row.
/// Empty cells are treated as missing (NaN). Extra columns are ignored.
fn load_csv(path: &Path) -> Result<ArrayTable, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| unreadable(path, e))?;
    let headers = reader.headers().map_err(|e| unreadable(path, e))?.clone();

    let columns: Vec<(&'static str, usize)> = ARRAY_NAMES
        .iter()
        .filter_map(|&name| headers.iter().position(|h| h.trim() == name).map(|i| (name, i)))
        .collect();

    let mut table: ArrayTable = columns.iter().map(|&(name, _)| (name, Vec::new())).collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| unreadable(path, e))?;
        for &(name, idx) in &columns {
            let cell = record.get(idx).unwrap_or("").trim();
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|_| {
                    LoadError::Schema(format!("row {row_no}, {name}: '{cell}' is not a number"))
                })?
            };
            if let Some(values) = table.get_mut(name) {
                values.push(value);
            }
        }
    }
    Ok(table)
}
