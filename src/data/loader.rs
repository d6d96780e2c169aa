use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use log::info;
use ndarray::Array2;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::SeismicSection;

/// Column (or header) name that carries the sample axis instead of a trace.
pub const SAMPLE_AXIS_COLUMN: &str = "sample_axis";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a seismic section from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one numeric column per trace, optional `sample_axis` column
/// * `.json`    – `{ "data": [[row], ...], "sample_axis": [...], "trace_axis": [...] }`
/// * `.csv`     – header row, one column per trace, optional leading `sample_axis`
///
/// For Parquet and CSV the trace axis is taken from the trace column names
/// when every one of them parses as a number.
pub fn load_file(path: &Path) -> Result<SeismicSection> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let section = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    info!(
        "loaded {} traces x {} samples from {}",
        section.num_traces(),
        section.num_samples(),
        path.display()
    );
    Ok(section)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Row-major JSON layout. Both axes are optional:
///
/// ```json
/// {
///   "data": [[0.1, -0.2, 0.0], [0.3, 0.1, -0.4]],
///   "sample_axis": [0.0, 0.004],
///   "trace_axis": [0.0, 25.0, 50.0]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct JsonSection {
    data: Vec<Vec<f64>>,
    #[serde(default)]
    sample_axis: Option<Vec<f64>>,
    #[serde(default)]
    trace_axis: Option<Vec<f64>>,
}

fn load_json(path: &Path) -> Result<SeismicSection> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let parsed: JsonSection = serde_json::from_str(&text).context("parsing JSON")?;

    Ok(SeismicSection {
        data: rows_to_array(&parsed.data)?,
        sample_axis: parsed.sample_axis,
        trace_axis: parsed.trace_axis,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, then one row per sample.
///
/// ```text
/// sample_axis,0,25,50
/// 0.000,0.1,-0.2,0.0
/// 0.004,0.3,0.1,-0.4
/// ```
fn load_csv(path: &Path) -> Result<SeismicSection> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let has_sample_axis = headers
        .first()
        .is_some_and(|h| h.eq_ignore_ascii_case(SAMPLE_AXIS_COLUMN));
    let first_trace = usize::from(has_sample_axis);

    let mut sample_axis = Vec::new();
    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut values = record.iter().enumerate().map(|(col, cell)| {
            cell.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row_no}, column {col}: '{cell}' is not a number"))
        });

        if has_sample_axis {
            match values.next() {
                Some(t) => sample_axis.push(t?),
                None => bail!("CSV row {row_no} is empty"),
            }
        }
        rows.push(values.collect::<Result<Vec<f64>>>()?);
    }

    Ok(SeismicSection {
        data: rows_to_array(&rows)?,
        sample_axis: has_sample_axis.then_some(sample_axis),
        trace_axis: numeric_names(&headers[first_trace..]),
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one trace per column.
///
/// Expected schema:
/// - any number of Float64 / Float32 / Int64 / Int32 columns – one trace each,
///   rows are samples
/// - optional `sample_axis` column – time/depth of every row
///
/// Works with wide frames written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SeismicSection> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let sample_idx = schema.index_of(SAMPLE_AXIS_COLUMN).ok();
    let trace_cols: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != sample_idx)
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    if trace_cols.is_empty() {
        bail!("Parquet file has no trace columns");
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut traces: Vec<Vec<f64>> = vec![Vec::new(); trace_cols.len()];
    let mut sample_axis = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        if let Some(idx) = sample_idx {
            extend_f64(&mut sample_axis, batch.column(idx))
                .context("reading 'sample_axis' column")?;
        }
        for ((col_idx, name), trace) in trace_cols.iter().zip(traces.iter_mut()) {
            extend_f64(trace, batch.column(*col_idx))
                .with_context(|| format!("reading trace column '{name}'"))?;
        }
    }

    let num_samples = traces[0].len();
    let data = Array2::from_shape_fn((num_samples, traces.len()), |(r, c)| traces[c][r]);
    let names: Vec<String> = trace_cols.into_iter().map(|(_, name)| name).collect();

    Ok(SeismicSection {
        data,
        sample_axis: sample_idx.map(|_| sample_axis),
        trace_axis: numeric_names(&names),
    })
}

// -- Parquet / Arrow helpers --

/// Append a numeric column to `out`, nulls becoming NaN.
fn extend_f64(out: &mut Vec<f64>, col: &Arc<dyn Array>) -> Result<()> {
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        out.extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        out.extend(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)));
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        out.extend(arr.iter().map(|v| v.map_or(f64::NAN, |i| i as f64)));
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        out.extend(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)));
    } else {
        bail!(
            "column type is {:?}, expected Float64, Float32, Int64 or Int32",
            col.data_type()
        );
    }
    Ok(())
}

// -- Shared helpers --

/// Build a samples × traces matrix from equally long rows.
fn rows_to_array(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let num_traces = rows.first().map_or(0, Vec::len);
    if let Some((row, values)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != num_traces)
    {
        bail!(
            "Row {row} has {} values but row 0 has {num_traces}",
            values.len()
        );
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), num_traces), flat).context("building sample matrix")
}

/// Parse every name as a number; `None` if any of them is not numeric.
fn numeric_names(names: &[String]) -> Option<Vec<f64>> {
    names.iter().map(|n| n.trim().parse::<f64>().ok()).collect()
}
