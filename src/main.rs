use clap::Parser;
use env_logger::Env;
use log::error;
use qualmask::cli::{self, Commands};
use qualmask::commands;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = cli::Args::parse();

    let result = match args.command {
        Commands::Process {
            input,
            output,
            threshold,
            window,
            threads,
            mask,
            no_mask,
            in_flight,
            config,
            report,
            quiet,
        } => commands::process::run(
            input,
            commands::process::ProcessOptions {
                output,
                threshold,
                window,
                threads,
                mask: mask_override(mask, no_mask),
                in_flight,
                config,
                report,
                quiet,
            },
        ),
        Commands::InitConfig { force } => commands::init_config::run(force),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn mask_override(mask: bool, no_mask: bool) -> Option<bool> {
    match (mask, no_mask) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
