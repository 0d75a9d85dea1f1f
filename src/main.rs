mod cli;
mod commands;

use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let version_flag = matches.get_flag("version");

    cli::init_logging(log_level.as_deref());

    if version_flag {
        println!("hn {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut out = io::stdout().lock();
    commands::run(&matches, &mut out)?;
    out.flush()?;
    Ok(())
}
