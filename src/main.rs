use anyhow::Context;
use check_conan_info::cli::{Cli, exit_code};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().context("failed to print usage")?;
            std::process::exit(exit_code(&err));
        }
    };

    check_conan_info::log::init()?;

    let mut stdout = std::io::stdout().lock();
    cli.command.run(&mut stdout)?;
    Ok(())
}
