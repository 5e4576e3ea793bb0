use log::error;
use turnstile_plot::area::{parse_cli, run};

fn main() {
    turnstile_plot::init_logger();
    let (csvin, outdir) = parse_cli();
    if let Err(e) = run(&csvin, outdir) {
        error!("{}", e);
        std::process::exit(1);
    }
}
