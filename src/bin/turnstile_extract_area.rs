use log::error;
use turnstile_plot::extract::{parse_cli, run_area};

fn main() {
    turnstile_plot::init_logger();
    let (jsonin, outdir) = parse_cli(
        "turnstile_extract_area",
        "cli app to extract the area plot data from the compiled experiment results",
    );
    if let Err(e) = run_area(&jsonin, outdir) {
        error!("{}", e);
        std::process::exit(1);
    }
}
