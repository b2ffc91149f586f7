//! CLI for the artifacts upload lifecycle.

mod commands;

use anyhow::Result;
use artifacts_core::client::Client;
use artifacts_core::config::{self, ProviderConfig};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{
    run_apply, run_checksum, run_completions, run_delete, run_destroy, run_plan, run_sha1,
    run_upload,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "artifacts")]
#[command(about = "Upload artifacts to an Artifactory-compatible store and keep them in sync", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Connection settings. Each overrides the config file and `ARTIFACTORY_*` environment.
#[derive(Debug, Default, Args)]
pub struct ProviderArgs {
    /// Base URL of the storage service.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Username for basic auth (requires --password).
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for basic auth.
    #[arg(long, global = true)]
    pub password: Option<String>,
}

impl ProviderArgs {
    fn into_config(self) -> ProviderConfig {
        ProviderConfig {
            url: self.url,
            username: self.username,
            password: self.password,
        }
    }
}

/// Desired upload, as the resource would be configured.
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to upload to, relative to the service URL.
    #[arg(long)]
    pub upload_path: String,

    /// File containing content to upload.
    #[arg(long)]
    pub upload_file: PathBuf,

    /// Path the artifact currently lives at, if it is being moved.
    #[arg(long)]
    pub prior_path: Option<String>,

    /// Leave the remote file in place on destroy or path change.
    #[arg(long)]
    pub keep_old_path: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the SHA1 of a local file.
    Sha1 {
        /// Path to the file.
        file: PathBuf,
    },

    /// Print the SHA1 the service reports for a remote path.
    Checksum {
        /// Remote path, relative to the service URL.
        path: String,
    },

    /// Upload a file to a remote path.
    Upload {
        /// Remote path, relative to the service URL.
        path: String,
        /// Local file to upload.
        file: PathBuf,
    },

    /// Delete a remote path.
    Delete {
        /// Remote path, relative to the service URL.
        path: String,
    },

    /// Show what `apply` would do.
    Plan(UploadArgs),

    /// Upload if the remote artifact is missing or differs from the local file.
    Apply(UploadArgs),

    /// Remove the managed artifact.
    Destroy {
        /// Remote path of the artifact.
        #[arg(long)]
        upload_path: String,

        /// Only forget the artifact; leave the remote file in place.
        #[arg(long)]
        keep_old_path: bool,
    },

    /// Generate a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let overrides = cli.provider.into_config();
        cli.command.run(move || {
            let cfg = config::resolve(overrides)?;
            tracing::debug!("loaded config: {:?}", cfg);
            Ok(Client::new(cfg.connection()?))
        })
    }

    /// Dispatch the command. `client` is only called by commands that talk to
    /// the service, so local ones work without any configuration.
    pub fn run(self, client: impl FnOnce() -> Result<Client>) -> Result<()> {
        match self {
            CliCommand::Sha1 { file } => run_sha1(&file)?,
            CliCommand::Checksum { path } => run_checksum(&client()?, &path)?,
            CliCommand::Upload { path, file } => run_upload(&client()?, &path, &file)?,
            CliCommand::Delete { path } => run_delete(&client()?, &path)?,
            CliCommand::Plan(args) => run_plan(&client()?, &args)?,
            CliCommand::Apply(args) => run_apply(&client()?, &args)?,
            CliCommand::Destroy {
                upload_path,
                keep_old_path,
            } => run_destroy(&client()?, &upload_path, keep_old_path)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
