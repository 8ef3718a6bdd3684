//! # 网格相关子命令 CLI 定义
//!
//! `info`, `slice`, `demo` 子命令参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`, `commands/slice.rs`, `commands/demo.rs`

use super::{GridArgs, OutputArgs};
use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub grid: GridArgs,
}

/// slice 子命令参数
#[derive(Args, Debug)]
pub struct SliceArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Spectra type to keep (e.g., stellar, nebular)
    #[arg(short, long)]
    pub spectra: String,

    /// Output grid file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

/// demo 子命令参数
#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}
