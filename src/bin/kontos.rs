//! Kontos demonstration binary.

use std::process;

use kontos::demo::{DemoConfig, run};

fn main() {
    let config = DemoConfig::default();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = run(&config, &mut out) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
