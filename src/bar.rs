use super::output::{outdir_arg, Figure};
use super::style::{FONT, LIGHT_GRAY, PALETTE};
use super::{plot_csv, PlotError, Result, Series, Table, VERSION};
use clap::{App, Arg};
use log::{info, warn};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

pub const KIND: &str = "bar";
pub const FIGURE: Figure = Figure::new(16., 4.);

pub const APPLICATION_COLUMN: &str = "Application";
pub const DEFAULT_COLUMNS: usize = 5;
pub const BAR_WIDTH: f64 = 0.15;
pub const GROUP_GAP: f64 = 0.05;
pub const Y_MAX: f64 = 3.;
/// y ticks every 0.5
const Y_LABELS: usize = 7;

/// Horizontal placement of the bars of one application, relative to its index.
/// The first (baseline) bar stands alone, the others come in pairs,
/// with `gap` of extra space before each group.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub width: f64,
    pub gap: f64,
    pub offsets: Vec<f64>,
}

impl BarLayout {
    pub fn new(columns: usize, width: f64, gap: f64) -> BarLayout {
        let offsets = (0..columns)
            .map(|i| i as f64 * width + gap * ((i + 1) / 2) as f64)
            .collect();
        BarLayout {
            width,
            gap,
            offsets,
        }
    }

    /// Middle of the group, where the application label goes:
    /// halfway between the first and the last bar, so the label stays
    /// centred for any column count instead of sitting at 2.5 bar widths.
    pub fn center(&self) -> f64 {
        match (self.offsets.first(), self.offsets.last()) {
            (Some(first), Some(last)) => (first + last) / 2.,
            _ => 0.,
        }
    }

    /// Left and right edges of the group.
    pub fn span(&self) -> (f64, f64) {
        match (self.offsets.first(), self.offsets.last()) {
            (Some(first), Some(last)) => (first - self.width / 2., last + self.width / 2.),
            _ => (0., 0.),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarData {
    pub applications: Vec<String>,
    pub experiments: Vec<Series>,
}

impl BarData {
    /// The application names plus the first `columns` experiment columns.
    /// Fewer experiment columns is an error, the extra ones are left out.
    pub fn from_table(t: &Table, columns: usize) -> Result<BarData> {
        let applications: Vec<String> = t
            .text_column(APPLICATION_COLUMN)?
            .into_iter()
            .map(String::from)
            .collect();
        let names: Vec<&str> = t
            .column_names()
            .into_iter()
            .filter(|c| *c != APPLICATION_COLUMN)
            .collect();
        if names.len() < columns {
            return Err(PlotError::MissingColumns {
                expected: columns,
                found: names.len(),
            });
        }
        if names.len() > columns {
            warn!(
                "plotting the first {} experiment columns, ignoring {:?}",
                columns,
                &names[columns..]
            );
        }
        let experiments = names[..columns]
            .iter()
            .map(|c| t.column(c))
            .collect::<Result<Vec<Series>>>()?;
        Ok(BarData {
            applications,
            experiments,
        })
    }

    /// Each application name with the x of its label, the centre of its group.
    pub fn labels(&self, layout: &BarLayout) -> Vec<(f64, &str)> {
        self.applications
            .iter()
            .enumerate()
            .map(|(i, a)| (i as f64 + layout.center(), a.as_str()))
            .collect()
    }
}

/// Plots one bar per application and experiment to png.
pub fn plot_bar(data: &BarData, layout: &BarLayout, fout: &Path) -> Result<()> {
    let n = data.applications.len();
    if n == 0 {
        return Err(PlotError::Render(String::from("no applications to plot")));
    }
    let (left, right) = layout.span();
    let xmin = left - 0.3;
    let xmax = (n - 1) as f64 + right + 0.3;
    let legend_len = FIGURE.px(10.) as i32;
    let legend_half = FIGURE.px(3.5) as i32;
    info!(
        "{} applications, {} bars each at offsets {:?}",
        n,
        data.experiments.len(),
        layout.offsets
    );

    let root = BitMapBackend::new(fout, FIGURE.pixels()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(FIGURE.px(6.))
        .x_label_area_size(FIGURE.px(90.))
        .y_label_area_size(FIGURE.px(40.))
        .build_cartesian_2d(xmin..xmax, 0f64..Y_MAX)?;
    // application names are drawn below at the group centres
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_labels(Y_LABELS)
        .bold_line_style(LIGHT_GRAY.stroke_width(1))
        .light_line_style(TRANSPARENT.stroke_width(0))
        .set_all_tick_mark_size(FIGURE.px(3.))
        .y_label_style((FONT, FIGURE.px(10.)))
        .y_label_formatter(&|y: &f64| format!("{:.1}", y))
        .x_desc("Applications")
        .y_desc("Relative Run-time")
        .axis_desc_style((FONT, FIGURE.px(10.)))
        .draw()?;

    let label_style = (FONT, FIGURE.px(10.))
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let tick = FIGURE.px(3.) as i32;
    for (x, app) in data.labels(layout) {
        let (px, py) = chart.plotting_area().map_coordinate(&(x, 0.));
        root.draw(&PathElement::new(vec![(px, py), (px, py + tick)], BLACK))?;
        root.draw(&Text::new(app, (px, py + 2 * tick), label_style.clone()))?;
    }

    for (j, (series, offset)) in data.experiments.iter().zip(layout.offsets.iter()).enumerate() {
        let color = PALETTE[j % PALETTE.len()];
        chart
            .draw_series(series.values.iter().enumerate().map(|(i, h)| {
                let x0 = i as f64 + offset - layout.width / 2.;
                Rectangle::new(
                    [(x0, 0.), (x0 + layout.width, h.max(0.).min(Y_MAX))],
                    color.filled(),
                )
            }))?
            .label(series.name.clone())
            .legend(move |(x, y)| {
                Rectangle::new(
                    [(x, y - legend_half), (x + legend_len, y + legend_half)],
                    color.filled(),
                )
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .margin(FIGURE.px(4.))
        .label_font((FONT, FIGURE.px(10.)))
        .background_style(WHITE.mix(0.8))
        .border_style(LIGHT_GRAY)
        .draw()?;

    root.present().map_err(|e| PlotError::Write {
        path: fout.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Load, plot and save; returns the path of the png.
pub fn run(csvin: &Path, outdir: Option<PathBuf>, columns: usize) -> Result<PathBuf> {
    plot_csv(csvin, outdir, KIND, |table, fout| {
        let data = BarData::from_table(table, columns)?;
        let layout = BarLayout::new(columns, BAR_WIDTH, GROUP_GAP);
        plot_bar(&data, &layout, fout)
    })
}

/// Takes the CLI arguments that control the bar plot.
pub fn parse_cli() -> (PathBuf, Option<PathBuf>, usize) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("csv file with the bar data, e.g., plot-bar-data.csv")
        .index(1)
        .required(true);
    let arg_columns = Arg::with_name("columns")
        .help("number of experiment columns to plot, after the application column")
        .short("n")
        .long("columns")
        .takes_value(true)
        .default_value("5")
        .validator(|v| {
            v.parse::<usize>()
                .map(|_| ())
                .map_err(|e| format!("{}: {}", v, e))
        });
    let cli_args = App::new("turnstile_bar")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the relative run-time of each application")
        .arg(arg_csvin)
        .arg(arg_columns)
        .arg(outdir_arg())
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let outdir = cli_args.value_of("outdir").map(PathBuf::from);
    let columns = cli_args
        .value_of("columns")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_COLUMNS);
    (csvin, outdir, columns)
}
