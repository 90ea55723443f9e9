use clap::{Arg, ArgAction, Command};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use links_in::auth::user_interface::main_auth_flow;
use links_in::links::user_interface::handle_authenticated_session;
use links_in::utils::logging::initialize_logging;
use links_in::{AppConfig, CredentialStore, FileBackend, LinkStore};

fn cli() -> Command {
    Command::new("links-in")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal link manager")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding users, links and configuration"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Append log output to this file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = cli().get_matches();

    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_data_dir);

    let mut config = match AppConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if let Some(log_file) = matches.get_one::<String>("log-file") {
        config.log_file = PathBuf::from(log_file);
    }
    if matches.get_flag("verbose") {
        config.log_level = "debug".to_string();
    }

    if let Err(e) = initialize_logging(&config.log_file, config.level_filter()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let backend = match FileBackend::new(config.storage_dir()) {
        Ok(backend) => Rc::new(backend),
        Err(e) => {
            error!("Failed to open data directory: {}", e);
            eprintln!(
                "Failed to open data directory {}: {}",
                config.data_dir.display(),
                e
            );
            process::exit(1);
        }
    };
    info!("Using data directory {}", backend.base_dir().display());

    let credentials = CredentialStore::new(Rc::clone(&backend));
    let links = LinkStore::new(Rc::clone(&backend));

    // Each logout drops back to the menu
    while let Some(email) = main_auth_flow(&credentials) {
        handle_authenticated_session(&links, &email);
    }
}
