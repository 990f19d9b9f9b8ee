use std::process::ExitCode;

use clap::Parser;
use payshield_cli::{Cli, OutputFormat, output};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = payshield_cli::init_tracing(cli.verbose) {
        eprintln!("warning: {e}");
    }

    let result = payshield_cli::run(&cli).and_then(|report| output::render(cli.format, &report));
    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let text = output::render_error(cli.format, &e);
            match cli.format {
                OutputFormat::Json => println!("{text}"),
                OutputFormat::Human => eprintln!("{text}"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}
