//! CLI for the w2m Word-to-Markdown tools.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use w2m_core::config;
use w2m_core::download::{DownloadOptions, GetRequest};
use w2m_core::drive::{GraphDrive, RemoteDrive};
use w2m_core::session::FileStateStore;

use commands::{run_cd, run_extract, run_get, run_ls, run_me, run_pwd, run_resolve, run_update};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "w2m")]
#[command(about = "Word-to-Markdown helpers: document metadata and OneDrive downloads", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Extract metadata fields from a Markdown file or a directory of them.
    Extract {
        /// File or directory to scan.
        path: PathBuf,
        /// Output file, or `-` for stdout.
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Write JSON instead of a tab-separated table.
        #[arg(long)]
        json: bool,
    },

    /// Rewrite metadata fields from a table produced (and edited) from `extract`.
    Update {
        /// JSON array or tab-separated table with a `path` column.
        input: PathBuf,
    },

    /// Show the signed-in OneDrive user.
    Me,

    /// Resolve a sharing link and make it the root for path commands.
    Resolve {
        /// OneDrive / SharePoint sharing URL.
        link: String,
    },

    /// List a remote folder (relative to the remote working directory).
    Ls {
        path: Option<String>,
    },

    /// Change the remote working directory (no argument: back to the root).
    Cd {
        path: Option<String>,
    },

    /// Print the remote working directory.
    Pwd,

    /// Download a remote file, or a whole folder with --recursive.
    Get {
        /// Remote path, relative to the remote working directory.
        path: String,
        /// Local directory to save into, or file name for a single download.
        local: Option<PathBuf>,
        /// Download a folder and everything below it.
        #[arg(short, long)]
        recursive: bool,
        /// Keep downloading after a failed file or listing.
        #[arg(long)]
        keep_going: bool,
        /// Transfers in flight at once (default from config).
        #[arg(short = 'j', long, value_name = "N")]
        jobs: Option<usize>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let cwd = std::env::current_dir()?;
        let store = FileStateStore::new(cwd.join(&cfg.state_file));
        let drive = || -> Result<Arc<dyn RemoteDrive>> {
            let mut drive_cfg = cfg.clone();
            drive_cfg.tokens_file = cwd.join(&cfg.tokens_file);
            Ok(Arc::new(GraphDrive::from_config(&drive_cfg)?))
        };

        match cli.command {
            CliCommand::Extract { path, output, json } => {
                run_extract(&cfg, &cwd, &path, &output, json)?
            }
            CliCommand::Update { input } => run_update(&cfg, &cwd, &input)?,
            CliCommand::Me => run_me(drive()?.as_ref()).await?,
            CliCommand::Resolve { link } => run_resolve(drive()?.as_ref(), &store, &link).await?,
            CliCommand::Ls { path } => run_ls(drive()?.as_ref(), &store, path.as_deref()).await?,
            CliCommand::Cd { path } => run_cd(&store, path.as_deref())?,
            CliCommand::Pwd => run_pwd(&store)?,
            CliCommand::Get {
                path,
                local,
                recursive,
                keep_going,
                jobs,
            } => {
                let req = GetRequest {
                    remote_path: path,
                    local,
                    recursive,
                    options: DownloadOptions {
                        max_concurrent: jobs.unwrap_or_else(|| cfg.download_concurrency()),
                        keep_going,
                        progress_tx: None,
                    },
                };
                run_get(drive()?, &store, &cwd, req).await?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
