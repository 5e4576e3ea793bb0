use super::output::{outdir_arg, Figure};
use super::style::{DARK_GRAY, FONT, LIGHT_BLUE, LIGHT_GRAY, LIGHT_SALMON};
use super::ticks::{decade_bounds, log_ticks, tick_label};
use super::{min_and_max, plot_csv, PlotError, Result, Series, Table, VERSION};
use clap::{App, Arg};
use log::info;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub const KIND: &str = "area";
pub const FIGURE: Figure = Figure::new(6., 3.5);

/// Vertical guide lines: x position, label, label height.
pub const GUIDES: [(f64, &str, f64); 2] = [(30., "30 Hz", 3.5), (250., "250 Hz", 14.)];

pub struct BandStyle {
    pub label: &'static str,
    pub median_label: &'static str,
    pub line: RGBColor,
    pub fill: RGBColor,
    pub alpha: f64,
}

pub const SELECTIVE: BandStyle = BandStyle {
    label: "Selectively-managed",
    median_label: "Selectively-managed (Median)",
    line: BLUE,
    fill: LIGHT_BLUE,
    alpha: 0.7,
};

pub const EXHAUSTIVE: BandStyle = BandStyle {
    label: "Exhaustively-managed",
    median_label: "Exhaustively-managed (Median)",
    line: RED,
    fill: LIGHT_SALMON,
    alpha: 0.35,
};

/// The min, median and max run-time at each frequency.
#[derive(Debug, Clone)]
pub struct Band {
    pub min: Series,
    pub med: Series,
    pub max: Series,
}

impl Band {
    fn from_table(t: &Table, prefix: &str) -> Result<Band> {
        Ok(Band {
            min: t.column(&format!("{}-Min", prefix))?,
            med: t.column(&format!("{}-Med", prefix))?,
            max: t.column(&format!("{}-Max", prefix))?,
        })
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.min
            .values
            .iter()
            .chain(self.med.values.iter())
            .chain(self.max.values.iter())
            .copied()
    }
}

#[derive(Debug, Clone)]
pub struct AreaData {
    pub frequency: Series,
    pub selective: Band,
    pub exhaustive: Band,
}

impl AreaData {
    pub fn from_table(t: &Table) -> Result<AreaData> {
        Ok(AreaData {
            frequency: t.column("Frequency")?,
            selective: Band::from_table(t, "Selective")?,
            exhaustive: Band::from_table(t, "Exhaustive")?,
        })
    }

    /// x axis bounds, whole decades around the frequencies
    pub fn x_range(&self) -> Result<(f64, f64)> {
        log_range(&self.frequency.values, "Frequency")
    }

    /// y axis bounds, whole decades around all the run-times
    pub fn y_range(&self) -> Result<(f64, f64)> {
        let all: Vec<f64> = self
            .selective
            .values()
            .chain(self.exhaustive.values())
            .collect();
        log_range(&all, "run-time")
    }
}

fn log_range(v: &[f64], what: &str) -> Result<(f64, f64)> {
    if v.iter().any(|x| !x.is_finite()) {
        return Err(PlotError::Render(format!(
            "{} values must be finite on a log axis",
            what
        )));
    }
    match min_and_max(v) {
        Some((min, max)) if min > 0. => Ok(decade_bounds(min, max)),
        Some(_) => Err(PlotError::Render(format!(
            "{} values must be positive on a log axis",
            what
        ))),
        None => Err(PlotError::Render(format!("no {} values to plot", what))),
    }
}

fn points(x: &Series, y: &Series) -> Vec<(f64, f64)> {
    x.values.iter().copied().zip(y.values.iter().copied()).collect()
}

/// Plots the two bands on log-log axes to png.
pub fn plot_area(data: &AreaData, fout: &Path) -> Result<()> {
    let (xmin, xmax) = data.x_range()?;
    let (ymin, ymax) = data.y_range()?;
    let line_width = FIGURE.px(1.5);
    let legend_len = FIGURE.px(14.) as i32;
    let legend_half = FIGURE.px(3.) as i32;
    let (dash, space) = (FIGURE.px(4.), FIGURE.px(2.));

    let root = BitMapBackend::new(fout, FIGURE.pixels()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(FIGURE.px(6.))
        .x_label_area_size(FIGURE.px(40.))
        .y_label_area_size(FIGURE.px(40.))
        .build_cartesian_2d(
            (xmin..xmax)
                .log_scale()
                .with_key_points(log_ticks(xmin, xmax).all()),
            (ymin..ymax)
                .log_scale()
                .with_key_points(log_ticks(ymin, ymax).all()),
        )?;
    chart
        .configure_mesh()
        .bold_line_style(LIGHT_GRAY.mix(0.7).stroke_width(1))
        .light_line_style(TRANSPARENT.stroke_width(0))
        .set_all_tick_mark_size(FIGURE.px(3.))
        .x_label_style(
            (FONT, FIGURE.px(8.))
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_style((FONT, FIGURE.px(8.)))
        .x_label_formatter(&|x: &f64| tick_label(*x))
        .y_label_formatter(&|y: &f64| tick_label(*y))
        .x_desc("Input Rate (Hz)")
        .y_desc("Relative Run-time")
        .axis_desc_style((FONT, FIGURE.px(10.)))
        .draw()?;

    // exhaustive first, the selective band sits on top
    for (band, look) in [(&data.exhaustive, &EXHAUSTIVE), (&data.selective, &SELECTIVE)].iter() {
        let lower = points(&data.frequency, &band.min);
        let upper = points(&data.frequency, &band.max);
        let median = points(&data.frequency, &band.med);
        let fill = look.fill.mix(look.alpha);
        let line = look.line;

        let mut outline = lower.clone();
        outline.extend(upper.iter().rev());
        chart
            .draw_series(std::iter::once(Polygon::new(outline, fill.filled())))?
            .label(look.label)
            .legend(move |(x, y)| {
                Rectangle::new(
                    [(x, y - legend_half), (x + legend_len, y + legend_half)],
                    fill.filled(),
                )
            });
        chart.draw_series(LineSeries::new(lower, line.stroke_width(line_width)))?;
        chart.draw_series(LineSeries::new(upper, line.stroke_width(line_width)))?;

        chart.draw_series(
            median
                .iter()
                .map(|p| Circle::new(*p, FIGURE.px(1.5), line.filled())),
        )?;
        chart
            .draw_series(DashedLineSeries::new(
                median,
                dash,
                space,
                line.stroke_width(line_width),
            ))?
            .label(look.median_label)
            .legend(move |(x, y)| {
                DashedPathElement::new(
                    vec![(x, y), (x + legend_len, y)],
                    dash,
                    space,
                    line.stroke_width(line_width),
                )
            });
    }

    for &(x, label, label_y) in GUIDES.iter() {
        if x < xmin || x > xmax {
            info!("guide line at {} is outside of the x axis, skipped", x);
            continue;
        }
        chart.draw_series(DashedLineSeries::new(
            vec![(x, ymin), (x, ymax)],
            dash,
            space,
            DARK_GRAY.stroke_width(FIGURE.px(1.)),
        ))?;
        chart.plotting_area().draw(&Text::new(
            label,
            (x, label_y.max(ymin).min(ymax)),
            (FONT, FIGURE.px(10.))
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&DARK_GRAY),
        ))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .margin(FIGURE.px(4.))
        .label_font((FONT, FIGURE.px(7.)))
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
pub fn run(csvin: &Path, outdir: Option<PathBuf>) -> Result<PathBuf> {
    plot_csv(csvin, outdir, KIND, |table, fout| {
        let data = AreaData::from_table(table)?;
        plot_area(&data, fout)
    })
}

/// Takes the CLI arguments that control the area plot.
pub fn parse_cli() -> (PathBuf, Option<PathBuf>) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("csv file with the area data, e.g., plot-area-data.csv")
        .index(1)
        .required(true);
    let cli_args = App::new("turnstile_area")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the relative run-time against the input rate")
        .arg(arg_csvin)
        .arg(outdir_arg())
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let outdir = cli_args.value_of("outdir").map(PathBuf::from);
    (csvin, outdir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table(content: &str) -> (tempfile::TempDir, Table) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("area.csv");
        std::fs::File::create(&p)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        let t = Table::from_csv(&p).unwrap();
        (dir, t)
    }

    const HEADER: &str = "Frequency,Selective-Min,Selective-Med,Selective-Max,Exhaustive-Min,Exhaustive-Med,Exhaustive-Max\n";

    #[test]
    fn ranges_cover_whole_decades() {
        let (_dir, t) = table(&format!(
            "{}10,1.1,1.5,2,1.2,2,5\n100,1.2,2,4,2,6,20\n1000,2,4,8,5,30,90\n",
            HEADER
        ));
        let data = AreaData::from_table(&t).unwrap();
        assert_eq!(data.selective.med.values, vec![1.5, 2., 4.]);
        assert_eq!(data.x_range().unwrap(), (10., 1000.));
        assert_eq!(data.y_range().unwrap(), (1., 100.));
    }

    #[test]
    fn non_numeric_is_rejected() {
        let (_dir, t) = table(&format!("{}10,1,1,1,1,x,1\n", HEADER));
        assert!(matches!(
            AreaData::from_table(&t),
            Err(PlotError::Conversion { .. })
        ));
    }

    #[test]
    fn log_axis_needs_positive_values() {
        let (_dir, t) = table(&format!("{}0,1,1,1,1,1,1\n", HEADER));
        let data = AreaData::from_table(&t).unwrap();
        assert!(data.x_range().is_err());
    }

    #[test]
    fn infinite_frequency_is_rejected() {
        let (_dir, t) = table(&format!("{}inf,2,2,2,2,2,2
", HEADER));
        assert!(matches!(
            AreaData::from_table(&t),
            Err(PlotError::Conversion { row: 1, .. })
        ));
    }

    #[test]
    fn log_range_needs_finite_values() {
        assert!(matches!(
            log_range(&[10., f64::INFINITY], "Frequency"),
            Err(PlotError::Render(_))
        ));
        assert!(log_range(&[f64::NAN, 10.], "Frequency").is_err());
        assert_eq!(log_range(&[12., 990.], "Frequency").unwrap(), (10., 1000.));
    }
}
