//! # sedgrid - 恒星族群光谱网格工具
//!
//! 加载预计算的 SED 网格，按 (年龄, 金属丰度) 下标获取合成光谱并组合。
//!
//! ## 子命令
//! - `info` - 网格信息
//! - `sed` - 获取网格点 SED 并相加
//! - `integrate` - 恒星粒子积分 SED
//! - `slice` - 抽取单一光谱类型
//! - `check` - 批量检查网格文件
//! - `demo` - 示例：test_grid 上 (5,5) + (3,5)
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (网格与粒子解析器)
//!   │     ├── spectra/   (积分 SED、导出、绘图)
//!   │     ├── batch/     (批量检查)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod spectra;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
