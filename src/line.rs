use super::output::{outdir_arg, Figure};
use super::style::{DARK_GREEN, FONT};
use super::ticks::{percent_label, tick_label};
use super::{plot_csv, PlotError, Result, Series, Table, VERSION};
use clap::{App, Arg};
use log::{info, warn};
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub const KIND: &str = "line";
pub const FIGURE: Figure = Figure::new(8., 4.);

pub const X_MAX: f64 = 100.;
pub const Y_MAX: f64 = 20.;
/// ticks every 10% and every 2 dataflows
const LABELS: usize = 11;

pub struct LineStyle {
    pub column: &'static str,
    pub color: RGBColor,
    pub dashed: bool,
}

pub const LINES: [LineStyle; 3] = [
    LineStyle {
        column: "Turnstile",
        color: BLUE,
        dashed: true,
    },
    LineStyle {
        column: "CodeQL",
        color: RED,
        dashed: true,
    },
    LineStyle {
        column: "Manual",
        color: DARK_GREEN,
        dashed: false,
    },
];

/// Loads the distribution series; missing or invalid values are dropped.
pub fn load_series(t: &Table) -> Result<Vec<Series>> {
    LINES.iter().map(|l| t.column_lossy(l.column)).collect()
}

/// Plots the empirical distribution of each series to png.
pub fn plot_line(series: &[Series], fout: &Path) -> Result<()> {
    let line_width = FIGURE.px(2.5);
    let (width, _) = FIGURE.pixels();

    let root = BitMapBackend::new(fout, FIGURE.pixels()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(FIGURE.px(8.))
        .margin_top(FIGURE.px(40.))
        .x_label_area_size(FIGURE.px(45.))
        .y_label_area_size(FIGURE.px(60.))
        .build_cartesian_2d(0f64..X_MAX, 0f64..Y_MAX)?;
    chart
        .configure_mesh()
        .x_labels(LABELS)
        .y_labels(LABELS)
        .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
        .light_line_style(TRANSPARENT.stroke_width(0))
        .set_all_tick_mark_size(FIGURE.px(3.))
        .label_style((FONT, FIGURE.px(12.)))
        .x_label_formatter(&|x: &f64| percent_label(*x))
        .y_label_formatter(&|y: &f64| tick_label(*y))
        .x_desc("Percentage of Applications")
        .y_desc("Number of Privacy-sensitive Dataflows Found")
        .axis_desc_style((FONT, FIGURE.px(13.)))
        .draw()?;

    let slot = width as i32 / 5;
    let sample_len = FIGURE.px(40.) as i32;
    let (dash, space) = (FIGURE.px(7.), FIGURE.px(3.));
    let legend_y = FIGURE.px(18.) as i32;
    for (i, (s, line)) in series.iter().zip(LINES.iter()).enumerate() {
        let dist = s.distribution();
        if dist.is_empty() {
            warn!("no values in column '{}', nothing to draw", s.name);
        } else {
            info!("'{}': {} values", s.name, dist.len());
        }
        let points: Vec<(f64, f64)> = dist
            .into_iter()
            .map(|(x, y)| (x, y.max(0.).min(Y_MAX)))
            .collect();
        let shape = line.color.stroke_width(line_width);

        // legend in one row above the plot
        let x0 = width as i32 / 2 - slot * 3 / 2 + i as i32 * slot;
        let sample = [(x0, legend_y), (x0 + sample_len, legend_y)];
        if line.dashed {
            chart.draw_series(DashedLineSeries::new(points, dash, space, shape))?;
            root.draw(&DashedPathElement::new(sample.to_vec(), dash, space, shape))?;
        } else {
            chart.draw_series(LineSeries::new(points, shape))?;
            root.draw(&PathElement::new(sample.to_vec(), shape))?;
        }
        root.draw(&Text::new(
            s.name.clone(),
            (x0 + sample_len + FIGURE.px(6.) as i32, legend_y - FIGURE.px(7.) as i32),
            (FONT, FIGURE.px(14.)).into_font().color(&BLACK),
        ))?;
    }

    root.present().map_err(|e| PlotError::Write {
        path: fout.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Load, plot and save; returns the path of the png.
pub fn run(csvin: &Path, outdir: Option<PathBuf>) -> Result<PathBuf> {
    plot_csv(csvin, outdir, KIND, |table, fout| {
        let series = load_series(table)?;
        plot_line(&series, fout)
    })
}

/// Takes the CLI arguments that control the distribution plot.
pub fn parse_cli() -> (PathBuf, Option<PathBuf>) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("csv file with the Turnstile, CodeQL and Manual dataflow counts")
        .index(1)
        .required(true);
    let cli_args = App::new("turnstile_line")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the distribution of the privacy-sensitive dataflows found")
        .arg(arg_csvin)
        .arg(outdir_arg())
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let outdir = cli_args.value_of("outdir").map(PathBuf::from);
    (csvin, outdir)
}
