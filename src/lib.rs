use chrono::prelude::*;
use csv::{StringRecord, Trim};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
pub mod area;
pub mod bar;
pub mod error;
pub mod extract;
pub mod line;
pub mod output;
pub mod style;
pub mod ticks;

pub use error::{PlotError, Result};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Environment variable naming the directory where charts and extracted data land.
pub const OUTPUT_ROOT_VAR: &str = "TURNSTILE_OUTPUT_ROOT";

/// A csv file loaded in memory: the header and the records, in file order.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

/// One row of a [`Table`], addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a StringRecord,
    fields: &'a StringRecord,
}

impl<'a> Record<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| self.fields.get(i))
    }
}

/// A named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Table {
    /// Init a Table from csv, using the first row as header.
    /// Every record must have as many fields as the header.
    pub fn from_csv(fin: &Path) -> Result<Table> {
        if !fin.exists() {
            return Err(PlotError::FileNotFound(fin.to_path_buf()));
        }
        let parse_err = |source| PlotError::Parse {
            path: fin.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::All)
            .from_path(fin)
            .map_err(parse_err)?;
        let headers = reader.headers().map_err(parse_err)?.clone();
        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()
            .map_err(parse_err)?;
        debug!(
            "loaded {} records with columns {:?} from {}",
            rows.len(),
            headers,
            fin.display()
        );
        Ok(Table { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        let headers = &self.headers;
        self.rows.iter().map(move |fields| Record { headers, fields })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.headers.iter().collect()
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PlotError::MissingColumn(name.to_string()))
    }

    /// Raw text values of a column, in row order.
    pub fn text_column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.index_of(name)?;
        Ok(self.rows.iter().map(|r| r.get(idx).unwrap_or("")).collect())
    }

    /// Numeric column; any value that is not a finite number is an error.
    pub fn column(&self, name: &str) -> Result<Series> {
        let values = self
            .text_column(name)?
            .into_iter()
            .enumerate()
            .map(|(i, raw)| match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(PlotError::Conversion {
                    column: name.to_string(),
                    row: i + 1,
                    value: raw.to_string(),
                }),
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Series::new(name, values))
    }

    /// Numeric column dropping missing, non-numeric and NAN values.
    pub fn column_lossy(&self, name: &str) -> Result<Series> {
        let raw = self.text_column(name)?;
        let total = raw.len();
        let values: Vec<f64> = raw
            .into_iter()
            .filter_map(|v| v.parse::<f64>().ok())
            .filter(|v| !v.is_nan())
            .collect();
        if values.len() < total {
            info!(
                "column '{}': dropped {} missing or invalid values",
                name,
                total - values.len()
            );
        }
        Ok(Series::new(name, values))
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.column_names().join(","))?;
        for r in self.rows.iter() {
            writeln!(f, "{}", r.iter().collect::<Vec<&str>>().join(","))?
        }
        Ok(())
    }
}

impl Series {
    pub fn new(name: &str, values: Vec<f64>) -> Series {
        Series {
            name: name.to_string(),
            values,
        }
    }

    /// Empirical distribution of the series:
    /// the values sorted ascending, each paired with its rank as a percentage of the length,
    /// i.e., (rank / n * 100, value) with rank in 1..=n.
    pub fn distribution(&self) -> Vec<(f64, f64)> {
        let mut sorted: Vec<f64> = self.values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len() as f64;
        sorted
            .into_iter()
            .enumerate()
            .map(|(i, v)| ((i + 1) as f64 * 100. / n, v))
            .collect()
    }
}

/// Logs to stderr, `info` unless RUST_LOG says otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut s_iter = s.iter();
    let (mut min, mut max) = match s_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in s_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

/// The load, render and save sequence shared by the chart apps.
/// The output root is `outdir` when given, otherwise the environment variable.
/// Returns the path of the written image; a partly drawn image is removed.
pub fn plot_csv<F>(csvin: &Path, outdir: Option<PathBuf>, kind: &str, draw: F) -> Result<PathBuf>
where
    F: FnOnce(&Table, &Path) -> Result<()>,
{
    let root = match outdir {
        Some(d) => d,
        None => output::output_root_from_env()?,
    };
    let table = Table::from_csv(csvin)?;
    info!("read {} records from {}", table.len(), csvin.display());
    let fout = output::output_path(&root, kind, Local::now())?;
    if let Err(e) = draw(&table, &fout) {
        if fout.exists() {
            warn!("removing the incomplete {}", fout.display());
            std::fs::remove_file(&fout).map_err(|io| PlotError::Write {
                path: fout.clone(),
                reason: io.to_string(),
            })?;
        }
        return Err(e);
    }
    println!("Plot saved to {}", fout.display());
    Ok(fout)
}
