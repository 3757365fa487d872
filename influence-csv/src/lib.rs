//! Sliding-window CSV-to-statement converter for the influence solver.
//!
//! This crate never touches `Solver`, `Statement`, or any container - it
//! only produces the external statement-tuple stream the solver's
//! `add`/`add_many` already accept, with quality spelled out as one of the
//! solver's own canonical tokens (`"mono"`, `"anti"`, `"constant"`,
//! `"arbitrary"`) so this crate has no dependency on the solver crate at
//! all.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use failure::Fail;

/// `(influencing, (x0, x1), quality, (y0, y1), influenced)`.
pub type StatementTuple = (String, (f64, f64), String, (f64, f64), String);

#[derive(Debug, Fail)]
pub enum InfluenceCsvError {
    #[fail(display = "could not read CSV at {:?}: {}", path, source)]
    Io { path: PathBuf, source: String },

    #[fail(display = "CSV has no header row")]
    EmptyFile,

    #[fail(
        display = "header row has an odd number of columns ({}); expected name pairs",
        columns
    )]
    OddColumnCount { columns: usize },

    #[fail(display = "could not parse {:?} as a number", value)]
    BadNumber { value: String },
}

/// Read a CSV whose header row holds `(influencing, influenced)` name pairs
/// two columns at a time, and whose data rows hold numeric `(x, y)` sample
/// pairs for each tracked pair side by side. Each group's samples come back
/// sorted by `x`.
pub fn read_samples(path: impl AsRef<Path>) -> Result<Vec<((String, String), Vec<(f64, f64)>)>, InfluenceCsvError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| InfluenceCsvError::Io {
            path: path.to_path_buf(),
            source: source.to_string(),
        })?;
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or(InfluenceCsvError::EmptyFile)?
        .map_err(|source| InfluenceCsvError::Io {
            path: path.to_path_buf(),
            source: source.to_string(),
        })?;
    if header.len() % 2 != 0 {
        return Err(InfluenceCsvError::OddColumnCount { columns: header.len() });
    }

    let mut groups: Vec<((String, String), Vec<(f64, f64)>)> = (0..header.len() / 2)
        .map(|i| {
            let influencing = header[i * 2].to_string();
            let influenced = header[i * 2 + 1].to_string();
            ((influencing, influenced), Vec::new())
        })
        .collect();

    for record in records {
        let record = record.map_err(|source| InfluenceCsvError::Io {
            path: path.to_path_buf(),
            source: source.to_string(),
        })?;
        for (i, group) in groups.iter_mut().enumerate() {
            let (x_cell, y_cell) = match (record.get(i * 2), record.get(i * 2 + 1)) {
                (Some(x), Some(y)) => (x.trim(), y.trim()),
                _ => continue,
            };
            if x_cell.is_empty() || y_cell.is_empty() {
                continue;
            }
            let x: f64 = x_cell
                .parse()
                .map_err(|_| InfluenceCsvError::BadNumber { value: x_cell.to_string() })?;
            if x.is_nan() {
                return Err(InfluenceCsvError::BadNumber { value: x_cell.to_string() });
            }
            let y: f64 = y_cell
                .parse()
                .map_err(|_| InfluenceCsvError::BadNumber { value: y_cell.to_string() })?;
            if y.is_nan() {
                return Err(InfluenceCsvError::BadNumber { value: y_cell.to_string() });
            }
            group.1.push((x, y));
        }
    }

    for group in &mut groups {
        group
            .1
            .sort_by(|a, b| a.0.partial_cmp(&b.0).expect("NaN rejected at parse time"));
    }

    Ok(groups)
}

struct Window {
    x0: f64,
    x1: f64,
    quality: &'static str,
    y0: f64,
    y1: f64,
}

/// Slide a window of width `granularity` across `samples` (already sorted by
/// `x`), stepping by `2/3 * granularity` and snapping the final window to
/// the data's right edge. Each window becomes one statement of height
/// `granularity` centered on the window's mean `y`, with quality derived
/// from the sign pattern of its pairwise slopes. Adjacent windows are then
/// post-processed so a y-gap between them is closed by stretching the
/// nearer edge of each by `granularity / 2`.
pub fn build_statements(
    samples: &[(f64, f64)],
    influencing: &str,
    influenced: &str,
    granularity: f64,
) -> Vec<StatementTuple> {
    if samples.len() < 2 || granularity <= 0.0 {
        return Vec::new();
    }

    let x_min = samples[0].0;
    let x_max = samples[samples.len() - 1].0;
    let step = granularity * 2.0 / 3.0;

    let mut bounds: Vec<(f64, f64)> = Vec::new();
    let mut start = x_min;
    loop {
        let end = (start + granularity).min(x_max);
        bounds.push((start, end));
        if end >= x_max {
            break;
        }
        start += step;
    }

    let mut windows: Vec<Window> = Vec::new();
    for (w_begin, w_end) in bounds {
        let mut last_index: Option<usize> = None;
        let mut points: Vec<(f64, f64)> = Vec::new();
        for (i, &(x, y)) in samples.iter().enumerate() {
            if x >= w_begin && x <= w_end {
                points.push((x, y));
                last_index = Some(i);
            }
        }

        let mut next = last_index.map_or(0, |i| i + 1);
        while points.len() < 2 && next < samples.len() {
            points.push(samples[next]);
            next += 1;
        }
        if points.len() < 2 {
            continue;
        }

        let mut saw_positive = false;
        let mut saw_negative = false;
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if (x1 - x0).abs() < f64::EPSILON {
                continue;
            }
            let slope = (y1 - y0) / (x1 - x0);
            if slope > 0.0 {
                saw_positive = true;
            } else if slope < 0.0 {
                saw_negative = true;
            }
        }
        let quality = match (saw_positive, saw_negative) {
            (true, true) => "arbitrary",
            (true, false) => "mono",
            (false, true) => "anti",
            (false, false) => "constant",
        };

        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / points.len() as f64;
        let half_height = granularity / 2.0;
        windows.push(Window {
            x0: w_begin,
            x1: w_end,
            quality,
            y0: mean_y - half_height,
            y1: mean_y + half_height,
        });
    }

    let stretch = granularity / 2.0;
    for i in 0..windows.len().saturating_sub(1) {
        if windows[i].y1 < windows[i + 1].y0 {
            windows[i].y1 += stretch;
            windows[i + 1].y0 -= stretch;
        }
    }

    windows
        .into_iter()
        .map(|w| {
            (
                influencing.to_string(),
                (w.x0, w.x1),
                w.quality.to_string(),
                (w.y0, w.y1),
                influenced.to_string(),
            )
        })
        .collect()
}
