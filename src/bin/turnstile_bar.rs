use log::error;
use turnstile_plot::bar::{parse_cli, run};

fn main() {
    turnstile_plot::init_logger();
    let (csvin, outdir, columns) = parse_cli();
    if let Err(e) = run(&csvin, outdir, columns) {
        error!("{}", e);
        std::process::exit(1);
    }
}
