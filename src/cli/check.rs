//! # check 子命令 CLI 定义
//!
//! 并行检查目录中的网格文件能否完整加载。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/check.rs`

use clap::Args;
use std::path::PathBuf;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory (or single file) containing grid files
    pub input: PathBuf,

    /// Glob pattern for grid files (comma separated for several)
    #[arg(long, default_value = "*.sedgrid")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
