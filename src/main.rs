//! Command line entry point for saving and deleting uploaded files.
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::Config;
use dotenvy::dotenv;
use validator::Validate;

use pushkind_filestore::domain::{extract_extension, strip_extension};
use pushkind_filestore::models::config::StoreConfig;
use pushkind_filestore::{FileStore, StorageStatus, UploadStream};

#[derive(Parser, Debug)]
#[command(author, version, about = "Save and delete files in upload directories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a local file into a target directory.
    Save {
        directory: String,
        file_name: String,
        source: PathBuf,
        /// Create the target directory if it is missing (`--create-dir=false`
        /// to refuse). Defaults to `create_directories` from the config.
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        create_dir: Option<bool>,
        /// Replace an existing file (`--overwrite=false` to refuse). Defaults
        /// to `overwrite_files` from the config.
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        overwrite: Option<bool>,
    },
    /// Delete a file, or every file sharing its stem.
    Delete {
        directory: String,
        file_name: String,
        /// Only delete the exact file name.
        #[arg(long)]
        exact: bool,
    },
    /// Print the lower-cased extension of a file name.
    Extension { file_name: String },
    /// Print a file name without its extension.
    Stem { file_name: String },
}

fn load_config() -> Option<StoreConfig> {
    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            return None;
        }
    };

    let store_config = match settings.try_deserialize::<StoreConfig>() {
        Ok(store_config) => store_config,
        Err(err) => {
            log::error!("Error loading store config: {}", err);
            return None;
        }
    };

    if let Err(err) = store_config.validate() {
        log::error!("Invalid store config: {}", err);
        return None;
    }

    Some(store_config)
}

fn report(status: StorageStatus) -> ExitCode {
    println!("{status}");
    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    // Load environment variables from `.env` in local development.
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    match cli.command {
        Command::Save {
            directory,
            file_name,
            source,
            create_dir,
            overwrite,
        } => {
            let Some(store_config) = load_config() else {
                return ExitCode::FAILURE;
            };
            let stream = match File::open(&source).and_then(UploadStream::from_file) {
                Ok(stream) => stream,
                Err(err) => {
                    log::error!("Cannot open {}: {}", source.display(), err);
                    return ExitCode::FAILURE;
                }
            };
            report(FileStore::local().save_stream(
                &store_config.directory_for(&directory),
                store_config.create_directories_or(create_dir),
                &file_name,
                stream,
                store_config.overwrite_files_or(overwrite),
            ))
        }
        Command::Delete {
            directory,
            file_name,
            exact,
        } => {
            let Some(store_config) = load_config() else {
                return ExitCode::FAILURE;
            };
            report(FileStore::local().delete_file(
                &store_config.directory_for(&directory),
                &file_name,
                exact,
            ))
        }
        Command::Extension { file_name } => {
            println!("{}", extract_extension(&file_name));
            ExitCode::SUCCESS
        }
        Command::Stem { file_name } => {
            println!("{}", strip_extension(&file_name));
            ExitCode::SUCCESS
        }
    }
}
