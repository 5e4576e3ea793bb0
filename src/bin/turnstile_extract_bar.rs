use log::error;
use turnstile_plot::extract::{parse_cli, run_bar};

fn main() {
    turnstile_plot::init_logger();
    let (jsonin, outdir) = parse_cli(
        "turnstile_extract_bar",
        "cli app to extract the bar plot data from the compiled experiment results",
    );
    if let Err(e) = run_bar(&jsonin, outdir) {
        error!("{}", e);
        std::process::exit(1);
    }
}
