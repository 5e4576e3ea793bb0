//! Prepares the csv files of the area and bar charts
//! from the compiled experiment results (json).
use super::output::{data_output_path, data_output_root, outdir_arg};
use super::{PlotError, Result, OUTPUT_ROOT_VAR, VERSION};
use chrono::Utc;
use clap::{App, Arg};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Interval (ms) of the 30 Hz workloads.
pub const INTERVAL_30HZ: f64 = 33.;
/// Interval (ms) of the 250 Hz workloads.
pub const INTERVAL_250HZ: f64 = 4.;

pub const AREA_HEADER: [&str; 7] = [
    "Frequency",
    "Selective-Min",
    "Selective-Med",
    "Selective-Max",
    "Exhaustive-Min",
    "Exhaustive-Med",
    "Exhaustive-Max",
];

pub const BAR_HEADER: [&str; 6] = [
    "Application",
    "Baseline",
    "Selectively-managed (30Hz)",
    "Selectively-managed (250Hz)",
    "Exhaustively-managed (30Hz)",
    "Exhaustively-managed (250Hz)",
];

/// One run of an application under a given input interval.
#[derive(Debug, Clone, Deserialize)]
pub struct Workload {
    /// milliseconds between inputs
    pub interval: f64,
    #[serde(default)]
    pub exhaustive: bool,
    /// elapsed time with tracking
    pub tm_elapsed: f64,
    /// elapsed time of the original application
    pub og_elapsed: f64,
}

impl Workload {
    pub fn frequency(&self) -> f64 {
        1000. / self.interval
    }

    /// relative run-time
    pub fn ratio(&self) -> f64 {
        self.tm_elapsed / self.og_elapsed
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppResult {
    pub app_name: String,
    pub workloads: Vec<Workload>,
}

pub fn load_results(fin: &Path) -> Result<Vec<AppResult>> {
    if !fin.exists() {
        return Err(PlotError::FileNotFound(fin.to_path_buf()));
    }
    let json_err = |source| PlotError::Json {
        path: fin.to_path_buf(),
        source,
    };
    let file = File::open(fin).map_err(|e| json_err(serde_json::Error::io(e)))?;
    let results: Vec<AppResult> = serde_json::from_reader(BufReader::new(file)).map_err(json_err)?;
    debug!("{} applications in {}", results.len(), fin.display());
    Ok(results)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub med: f64,
    pub max: f64,
}

/// Median of sorted values, the mean of the middle two for an even count.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        None
    } else if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.)
    } else {
        Some(sorted[n / 2])
    }
}

/// Averages the ratios of each application, then takes min, median and max across applications.
pub fn summarize(per_app: &BTreeMap<String, Vec<f64>>) -> Option<Summary> {
    let mut means: Vec<f64> = per_app
        .values()
        .filter(|v| !v.is_empty())
        .map(|v| v.iter().sum::<f64>() / v.len() as f64)
        .collect();
    means.sort_by(|a, b| a.total_cmp(b));
    Some(Summary {
        min: *means.first()?,
        med: median(&means)?,
        max: *means.last()?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaRow {
    pub frequency: f64,
    pub selective: Option<Summary>,
    pub exhaustive: Option<Summary>,
}

struct FrequencyGroup {
    frequency: f64,
    selective: BTreeMap<String, Vec<f64>>,
    exhaustive: BTreeMap<String, Vec<f64>>,
}

/// One row per input frequency, ascending.
pub fn area_rows(results: &[AppResult]) -> Vec<AreaRow> {
    let mut groups: Vec<FrequencyGroup> = Vec::new();
    for app in results {
        for w in &app.workloads {
            let frequency = w.frequency();
            let idx = match groups.iter().position(|g| g.frequency == frequency) {
                Some(i) => i,
                None => {
                    groups.push(FrequencyGroup {
                        frequency,
                        selective: BTreeMap::new(),
                        exhaustive: BTreeMap::new(),
                    });
                    groups.len() - 1
                }
            };
            let mode = if w.exhaustive {
                &mut groups[idx].exhaustive
            } else {
                &mut groups[idx].selective
            };
            mode.entry(app.app_name.clone()).or_default().push(w.ratio());
        }
    }
    groups.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
    groups
        .into_iter()
        .map(|g| AreaRow {
            frequency: g.frequency,
            selective: summarize(&g.selective),
            exhaustive: summarize(&g.exhaustive),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub application: String,
    pub selective_30: Option<f64>,
    pub selective_250: Option<f64>,
    pub exhaustive_30: Option<f64>,
    pub exhaustive_250: Option<f64>,
}

/// One row per application with the relative run-time at 30 and 250 Hz.
/// Later runs of the same configuration replace earlier ones.
pub fn bar_rows(results: &[AppResult]) -> Vec<BarRow> {
    results
        .iter()
        .map(|app| {
            let mut row = BarRow {
                application: app.app_name.clone(),
                selective_30: None,
                selective_250: None,
                exhaustive_30: None,
                exhaustive_250: None,
            };
            for w in &app.workloads {
                let slot = match (w.exhaustive, w.interval) {
                    (true, i) if i == INTERVAL_30HZ => &mut row.exhaustive_30,
                    (true, i) if i == INTERVAL_250HZ => &mut row.exhaustive_250,
                    (false, i) if i == INTERVAL_30HZ => &mut row.selective_30,
                    (false, i) if i == INTERVAL_250HZ => &mut row.selective_250,
                    _ => continue,
                };
                *slot = Some(w.ratio());
            }
            row
        })
        .collect()
}

fn field(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn summary_fields(s: Option<Summary>) -> [String; 3] {
    [
        field(s.map(|s| s.min)),
        field(s.map(|s| s.med)),
        field(s.map(|s| s.max)),
    ]
}

fn write_csv(fout: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let write_err = |e: csv::Error| PlotError::Write {
        path: fout.to_path_buf(),
        reason: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(fout).map_err(write_err)?;
    writer.write_record(header).map_err(write_err)?;
    for r in rows {
        writer.write_record(&r).map_err(write_err)?;
    }
    writer.flush().map_err(|e| PlotError::Write {
        path: fout.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}

pub fn write_area_csv(rows: &[AreaRow], fout: &Path) -> Result<()> {
    let records = rows
        .iter()
        .map(|r| {
            let mut rec = vec![r.frequency.to_string()];
            rec.extend(summary_fields(r.selective).iter().cloned());
            rec.extend(summary_fields(r.exhaustive).iter().cloned());
            rec
        })
        .collect();
    write_csv(fout, &AREA_HEADER, records)
}

pub fn write_bar_csv(rows: &[BarRow], fout: &Path) -> Result<()> {
    let records = rows
        .iter()
        .map(|r| {
            vec![
                r.application.clone(),
                String::from("1"),
                field(r.selective_30),
                field(r.selective_250),
                field(r.exhaustive_30),
                field(r.exhaustive_250),
            ]
        })
        .collect();
    write_csv(fout, &BAR_HEADER, records)
}

fn data_root(outdir: Option<PathBuf>) -> PathBuf {
    outdir.unwrap_or_else(|| data_output_root(std::env::var_os(OUTPUT_ROOT_VAR)))
}

/// Extracts the area chart data; returns the path of the csv.
pub fn run_area(jsonin: &Path, outdir: Option<PathBuf>) -> Result<PathBuf> {
    let fout = data_output_path(&data_root(outdir), "area", Utc::now())?;
    let rows = area_rows(&load_results(jsonin)?);
    info!("{} frequencies", rows.len());
    write_area_csv(&rows, &fout)?;
    println!("Saved area plot data at {}", fout.display());
    println!("Now you can plot the results by: turnstile_area {}", fout.display());
    Ok(fout)
}

/// Extracts the bar chart data; returns the path of the csv.
pub fn run_bar(jsonin: &Path, outdir: Option<PathBuf>) -> Result<PathBuf> {
    let fout = data_output_path(&data_root(outdir), "bar", Utc::now())?;
    let rows = bar_rows(&load_results(jsonin)?);
    info!("{} applications", rows.len());
    write_bar_csv(&rows, &fout)?;
    println!("Saved bar plot data at {}", fout.display());
    println!("Now you can plot the results by: turnstile_bar {}", fout.display());
    Ok(fout)
}

/// Takes the CLI arguments of the extraction apps.
pub fn parse_cli(name: &str, about: &str) -> (PathBuf, Option<PathBuf>) {
    let arg_jsonin = Arg::with_name("input_jsonfile")
        .help("compiled experiment results, e.g., exp-results-compiled.json")
        .index(1)
        .required(true);
    let cli_args = App::new(name)
        .version(VERSION.unwrap_or("unknown"))
        .about(about)
        .arg(arg_jsonin)
        .arg(outdir_arg())
        .get_matches();
    let jsonin = PathBuf::from(cli_args.value_of("input_jsonfile").unwrap_or_default());
    let outdir = cli_args.value_of("outdir").map(PathBuf::from);
    (jsonin, outdir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<AppResult> {
        serde_json::from_str(
            r#"[
            { "app_name": "file", "workloads": [
                { "interval": 33, "exhaustive": false, "tm_elapsed": 110, "og_elapsed": 100 },
                { "interval": 33, "exhaustive": false, "tm_elapsed": 130, "og_elapsed": 100 },
                { "interval": 4, "exhaustive": false, "tm_elapsed": 150, "og_elapsed": 100 },
                { "interval": 33, "exhaustive": true, "tm_elapsed": 200, "og_elapsed": 100 }
            ]},
            { "app_name": "sox", "workloads": [
                { "interval": 33, "exhaustive": false, "tm_elapsed": 140, "og_elapsed": 100 },
                { "interval": 4, "exhaustive": true, "tm_elapsed": 300, "og_elapsed": 100, "extra": 1 }
            ]}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn median_of_odd_and_even() {
        assert_eq!(median(&[1., 2., 3.]), Some(2.));
        assert_eq!(median(&[1., 2., 3., 5.]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn area_rows_by_frequency() {
        let rows = area_rows(&results());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].frequency, 1000. / 33.);
        assert_eq!(rows[1].frequency, 250.);
        let s = rows[0].selective.unwrap();
        // file averages 1.2, sox 1.4
        assert!((s.min - 1.2).abs() < 1e-9);
        assert!((s.med - 1.3).abs() < 1e-9);
        assert!((s.max - 1.4).abs() < 1e-9);
        assert_eq!(rows[0].exhaustive.unwrap().max, 2.);
        assert_eq!(rows[1].exhaustive.unwrap().min, 3.);
        assert_eq!(rows[1].selective.unwrap().med, 1.5);
    }

    #[test]
    fn bar_rows_pick_intervals() {
        let rows = bar_rows(&results());
        assert_eq!(rows[0].application, "file");
        assert_eq!(rows[0].selective_30, Some(1.3));
        assert_eq!(rows[0].selective_250, Some(1.5));
        assert_eq!(rows[0].exhaustive_30, Some(2.));
        assert_eq!(rows[0].exhaustive_250, None);
        assert_eq!(rows[1].exhaustive_250, Some(3.));
    }

    #[test]
    fn written_csv_has_empty_fields_for_missing_runs() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("bar.csv");
        write_bar_csv(&bar_rows(&results()), &fout).unwrap();
        let content = std::fs::read_to_string(&fout).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Application,Baseline,"));
        assert_eq!(lines[1], "file,1,1.3,1.5,2,");
        assert_eq!(lines[2], "sox,1,1.4,,,3");
    }

    #[test]
    fn missing_json_is_not_found() {
        assert!(matches!(
            load_results(Path::new("/no/such/results.json")),
            Err(PlotError::FileNotFound(_))
        ));
    }
}
