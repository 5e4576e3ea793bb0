use std::fs;
use std::path::{Path, PathBuf};
use turnstile_plot::{area, bar, extract, line, PlotError};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, content).unwrap();
    p
}

/// `<kind>-plot.YYYYMMDD_HHMMSS.png`
fn assert_plot_name(p: &Path, kind: &str) {
    let name = p.file_name().unwrap().to_str().unwrap();
    let prefix = format!("{}-plot.", kind);
    assert!(name.starts_with(&prefix), "{}", name);
    assert!(name.ends_with(".png"), "{}", name);
    let ts = &name[prefix.len()..name.len() - 4];
    assert_eq!(ts.len(), 15, "{}", name);
    for (i, c) in ts.chars().enumerate() {
        if i == 8 {
            assert_eq!(c, '_');
        } else {
            assert!(c.is_ascii_digit(), "{}", name);
        }
    }
}

const AREA_CSV: &str = "Frequency,Selective-Min,Selective-Med,Selective-Max,Exhaustive-Min,Exhaustive-Med,Exhaustive-Max
10,1.01,1.05,1.2,1.1,1.3,2
100,1.05,1.2,1.8,1.5,3,8
1000,1.3,2,4,4,12,40
";

#[test]
fn area_plot_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(dir.path(), "area.csv", AREA_CSV);
    let out = area::run(&csvin, Some(dir.path().to_path_buf())).unwrap();
    assert_eq!(out.parent().unwrap(), dir.path());
    assert_plot_name(&out, "area");
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn rerun_gives_new_name_same_image() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(dir.path(), "area.csv", AREA_CSV);
    let first = area::run(&csvin, Some(dir.path().to_path_buf())).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = area::run(&csvin, Some(dir.path().to_path_buf())).unwrap();
    assert_ne!(first, second);
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn bar_plot_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(
        dir.path(),
        "bar.csv",
        "Application,Baseline,Selectively-managed (30Hz),Selectively-managed (250Hz),Exhaustively-managed (30Hz),Exhaustively-managed (250Hz)
file,1,1.02,1.1,1.4,2.2
sox,1,1.01,1.05,1.2,3.6
modbus,1,1.1,1.3,1.9,2.7
",
    );
    let out = bar::run(&csvin, Some(dir.path().to_path_buf()), bar::DEFAULT_COLUMNS).unwrap();
    assert_plot_name(&out, "bar");
    assert!(out.is_file());
}

#[test]
fn bar_plot_with_too_few_columns_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(
        dir.path(),
        "bar.csv",
        "Application,Baseline,S30,S250\nfile,1,1.02,1.1\n",
    );
    let err = bar::run(&csvin, Some(dir.path().to_path_buf()), 5).unwrap_err();
    assert!(matches!(err, PlotError::MissingColumns { expected: 5, found: 3 }));
    let pngs = fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().map_or(false, |x| x == "png"))
        .count();
    assert_eq!(pngs, 0);
}

#[test]
fn line_plot_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(
        dir.path(),
        "line.csv",
        "Application,Turnstile,CodeQL,Manual\na,1,0,2\nb,2,1,\nc,3,4,3\nd,4,2,5\ne,5,,6\n",
    );
    let out = line::run(&csvin, Some(dir.path().to_path_buf())).unwrap();
    assert_plot_name(&out, "line");
    assert!(out.is_file());
}

#[test]
fn missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = line::run(&dir.path().join("nope.csv"), Some(dir.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, PlotError::FileNotFound(_)));
}

#[test]
fn extracted_area_data_plots() {
    let dir = tempfile::tempdir().unwrap();
    let jsonin = write(
        dir.path(),
        "exp-results-compiled.json",
        r#"[
  { "app_name": "file", "workloads": [
    { "interval": 100, "exhaustive": false, "tm_elapsed": 105, "og_elapsed": 100 },
    { "interval": 100, "exhaustive": true, "tm_elapsed": 130, "og_elapsed": 100 },
    { "interval": 33, "exhaustive": false, "tm_elapsed": 120, "og_elapsed": 100 },
    { "interval": 33, "exhaustive": true, "tm_elapsed": 250, "og_elapsed": 100 },
    { "interval": 4, "exhaustive": false, "tm_elapsed": 180, "og_elapsed": 100 },
    { "interval": 4, "exhaustive": true, "tm_elapsed": 900, "og_elapsed": 100 }
  ]},
  { "app_name": "sox", "workloads": [
    { "interval": 100, "exhaustive": false, "tm_elapsed": 102, "og_elapsed": 100 },
    { "interval": 100, "exhaustive": true, "tm_elapsed": 120, "og_elapsed": 100 },
    { "interval": 33, "exhaustive": false, "tm_elapsed": 110, "og_elapsed": 100 },
    { "interval": 33, "exhaustive": true, "tm_elapsed": 200, "og_elapsed": 100 },
    { "interval": 4, "exhaustive": false, "tm_elapsed": 150, "og_elapsed": 100 },
    { "interval": 4, "exhaustive": true, "tm_elapsed": 700, "og_elapsed": 100 }
  ]}
]"#,
    );
    let csv = extract::run_area(&jsonin, Some(dir.path().to_path_buf())).unwrap();
    let name = csv.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("plot-area-data.") && name.ends_with(".csv"));
    let table = turnstile_plot::Table::from_csv(&csv).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.column("Frequency").unwrap().values, vec![10., 1000. / 33., 250.]);
    let out = area::run(&csv, Some(dir.path().to_path_buf())).unwrap();
    assert_plot_name(&out, "area");
}

#[test]
fn output_root_comes_from_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(dir.path(), "area.csv", AREA_CSV);
    let root = dir.path().join("plots");
    fs::create_dir(&root).unwrap();

    std::env::set_var(turnstile_plot::OUTPUT_ROOT_VAR, &root);
    let out = area::run(&csvin, None);
    std::env::remove_var(turnstile_plot::OUTPUT_ROOT_VAR);
    let out = out.unwrap();
    assert_eq!(out.parent().unwrap(), root.as_path());
    assert_plot_name(&out, "area");
    assert!(out.is_file());

    let err = area::run(&csvin, None).unwrap_err();
    assert!(matches!(err, PlotError::MissingEnvironment(v) if v == turnstile_plot::OUTPUT_ROOT_VAR));
    assert_eq!(fs::read_dir(&root).unwrap().count(), 1);
}

#[test]
fn infinite_value_fails_without_image() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = write(
        dir.path(),
        "area.csv",
        "Frequency,Selective-Min,Selective-Med,Selective-Max,Exhaustive-Min,Exhaustive-Med,Exhaustive-Max\ninf,2,2,2,2,2,2\n",
    );
    let err = area::run(&csvin, Some(dir.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, PlotError::Conversion { row: 1, .. }));
    let pngs = fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().map_or(false, |x| x == "png"))
        .count();
    assert_eq!(pngs, 0);
}
