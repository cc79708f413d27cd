use clap::{ArgAction, Parser, Subcommand};

use crate::commands::import;

#[derive(Debug, Parser)]
#[command(name = "nlx", version)]
#[command(about = "Data import for versioned workspaces", long_about = None)]
pub struct Cli {
    /// ログを詳細にする（-v: info, -vv: debug, -vvv: trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// ファイルまたはURLをキャッシュに取り込みワークスペースにリンクする
    Import(import::Args),
}
