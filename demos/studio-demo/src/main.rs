mod cli;
mod commands;
mod console_delegate;
mod demo_encryptor;

use std::process::ExitCode;

use clap::Parser;

use cli::{Args, Command};

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(&args);

    let result = match &args.command {
        Command::Devices { granted } => commands::list_devices(*granted),
        Command::Record {
            seconds,
            screen,
            chunk_size,
        } => commands::record(&args, *seconds, *screen, *chunk_size),
        Command::List => commands::list_recordings(&args),
        Command::Export { id, out } => commands::export(&args, *id, out.clone()),
        Command::Delete { id } => commands::delete(&args, *id),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("studio-demo: {}", e);
            ExitCode::FAILURE
        }
    }
}
