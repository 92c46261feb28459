//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `projects_core` wiring against a real database file.
//! - Print the project list in a stable one-line-per-project format.

mod config;

use config::CliConfig;
use log::error;
use projects_core::{ProjectService, SqliteConnectionProvider, SqliteProjectRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CliConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = projects_core::init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("projects_core version={}", projects_core::core_version());
    println!("database={}", config.db_path.display());

    let provider = SqliteConnectionProvider::new(config.db_path);
    let service = ProjectService::new(SqliteProjectRepository::new(provider));

    match service.fetch_all_projects() {
        Ok(projects) => {
            for project in projects {
                println!(
                    "{:>4}  {}",
                    project.project_id.unwrap_or_default(),
                    project.project_name
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_list module=cli status=error error={err}");
            eprintln!("failed to list projects: {err}");
            ExitCode::FAILURE
        }
    }
}
