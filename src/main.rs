#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::command_line::cli::{Cli, Commands, solve_dir, solve_file, solve_text};
use clap::{CommandFactory, Parser};

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_logger(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() {
    let cli = Cli::parse();

    let debug = match &cli.command {
        Some(Commands::File { common, .. } | Commands::Dir { common, .. } | Commands::Text { common, .. }) => {
            common.debug
        }
        Some(Commands::Completions { .. }) | None => cli.common.debug,
    };
    init_logger(debug);

    let result = match cli.command {
        Some(Commands::File { path, common }) => solve_file(&path, &common),
        Some(Commands::Dir { path, common }) => solve_dir(&path, &common),
        Some(Commands::Text { input, common }) => solve_text(&input, &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "propsat", &mut std::io::stdout());
            Ok(())
        }
        None => match cli.path {
            Some(path) if path.is_dir() => solve_dir(&path, &cli.common),
            Some(path) => solve_file(&path, &cli.common),
            None => Err("No command provided. Use --help for more information.".to_string()),
        },
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
