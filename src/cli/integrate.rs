//! # integrate 子命令 CLI 定义
//!
//! 从恒星粒子 CSV 计算积分 SED。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/integrate.rs`

use super::{GridArgs, OutputArgs};
use clap::Args;
use std::path::PathBuf;

/// 解析逃逸分数（0-1）
pub fn parse_fesc(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .parse()
        .map_err(|_| format!("Invalid escape fraction '{}'", input))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("Escape fraction must be within [0, 1], got {}", value));
    }
    Ok(value)
}

/// integrate 子命令参数
#[derive(Args, Debug)]
pub struct IntegrateArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// CSV file with a 'mass' column and one column per grid axis
    #[arg(short, long)]
    pub particles: PathBuf,

    /// Escape fraction (0-1); the SED is scaled by (1 - fesc)
    #[arg(long, default_value = "0.0", value_parser = parse_fesc)]
    pub fesc: f64,

    /// Spectra type (default: stellar, or the first one in the grid)
    #[arg(short, long)]
    pub spectra: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fesc() {
        assert_eq!(parse_fesc("0.3").unwrap(), 0.3);
        assert!(parse_fesc("1.2").is_err());
        assert!(parse_fesc("x").is_err());
    }
}
