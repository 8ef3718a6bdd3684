//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `parsers/`, `spectra/`, `utils/`
//! - 子模块: common, info, sed, integrate, slice, check, demo

pub mod check;
pub mod common;
pub mod demo;
pub mod info;
pub mod integrate;
pub mod sed;
pub mod slice;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info(args) => info::execute(args),
        Commands::Sed(args) => sed::execute(args),
        Commands::Integrate(args) => integrate::execute(args),
        Commands::Slice(args) => slice::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Demo(args) => demo::execute(args),
    }
}
