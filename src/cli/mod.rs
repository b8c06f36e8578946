//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了命令行入口：单次加载或持续监视源对象。

use crate::config::{EnvLookup, LayeredLookup, TomlLookup};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "blob2redis")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "load", about = "Load a key-value file into the cache once")]
    Load(LoadArgs),

    #[command(name = "watch", about = "Reload the cache whenever the source object changes")]
    Watch(WatchArgs),
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    #[arg(short, long, help = "Source file (falls back to SourceBlob)")]
    pub file: Option<PathBuf>,

    #[arg(short, long, help = "Batch size (falls back to BatchSize, then 1000)")]
    pub batch_size: Option<String>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Load into an in-memory store instead of Redis")]
    pub dry_run: bool,

    #[arg(short, long, help = "Print the load result as JSON")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

mod load;
mod watch;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Load(args) => load::execute(args).await,
        Commands::Watch(args) => watch::execute(args).await,
    }
}

/// 环境变量优先，其次是配置文件
fn config_lookup(path: Option<&Path>) -> Result<LayeredLookup> {
    let mut lookup = LayeredLookup::new().with_layer(EnvLookup);
    if let Some(path) = path {
        lookup = lookup.with_layer(TomlLookup::from_file(path)?);
    }
    Ok(lookup)
}
