use super::{PlotError, Result, OUTPUT_ROOT_VAR};
use chrono::prelude::*;
use clap::Arg;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DPI: u32 = 300;
pub const PLOT_TS_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const DATA_TS_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Physical size of a chart; the bitmap is sized from inches at the given dpi.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Figure {
    pub const fn new(width_in: f64, height_in: f64) -> Figure {
        Figure {
            width_in,
            height_in,
            dpi: DPI,
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (self.px(self.width_in * 72.), self.px(self.height_in * 72.))
    }

    /// typographic points (1/72 in) to pixels
    pub fn px(&self, points: f64) -> u32 {
        (points * self.dpi as f64 / 72.).round() as u32
    }
}

/// Output root from the value of the environment variable; unset or empty is an error.
pub fn output_root(var: Option<OsString>) -> Result<PathBuf> {
    match var {
        Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => Err(PlotError::MissingEnvironment(OUTPUT_ROOT_VAR)),
    }
}

pub fn output_root_from_env() -> Result<PathBuf> {
    output_root(std::env::var_os(OUTPUT_ROOT_VAR))
}

/// Output root for the extracted data, falls back to the current directory.
pub fn data_output_root(var: Option<OsString>) -> PathBuf {
    output_root(var).unwrap_or_else(|_| PathBuf::from("."))
}

/// `-o/--outdir`, shared by all the apps.
pub fn outdir_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("outdir")
        .help("directory for the output file, overrides TURNSTILE_OUTPUT_ROOT")
        .short("o")
        .long("outdir")
        .takes_value(true)
}

pub fn timestamp<Tz: TimeZone>(now: &DateTime<Tz>, fmt: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(fmt).to_string()
}

fn check_dir(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(PlotError::Write {
            path: root.to_path_buf(),
            reason: String::from("output root is not an existing directory"),
        })
    }
}

/// `root/<kind>-plot.<YYYYMMDD_HHMMSS>.png`
pub fn output_path<Tz: TimeZone>(root: &Path, kind: &str, now: DateTime<Tz>) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    check_dir(root)?;
    Ok(root.join(format!(
        "{}-plot.{}.png",
        kind,
        timestamp(&now, PLOT_TS_FORMAT)
    )))
}

/// `root/plot-<kind>-data.<YYYY-MM-DD-HH-MM-SS>.csv`
pub fn data_output_path(root: &Path, kind: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    check_dir(root)?;
    Ok(root.join(format!(
        "plot-{}-data.{}.csv",
        kind,
        timestamp(&now, DATA_TS_FORMAT)
    )))
}
