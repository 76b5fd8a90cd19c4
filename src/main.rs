use clap::Parser;
use ethtools::{
    cli::{Cli, Commands},
    Solc,
};
use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let color = io::stdout().is_terminal();

    let code = match cli.command {
        Commands::Compile(args) => {
            let solc = Solc::new(&args.solc);
            args.run(solc, &mut io::stdout().lock(), &mut io::stderr(), color)
        }
    };

    match code {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
