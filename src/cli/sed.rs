//! # sed 子命令 CLI 定义
//!
//! 按网格下标（或最近物理值）获取 SED，并将多个 SED 相加。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sed.rs`

use super::{GridArgs, OutputArgs};
use clap::Args;

/// 网格点下标，如 `5,5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPoint(pub Vec<usize>);

/// 按物理值查找的网格点，如 `log10age=7.0,metallicity=0.01`
#[derive(Debug, Clone, PartialEq)]
pub struct NearestPoint(pub Vec<(String, f64)>);

/// 解析网格点下标
pub fn parse_point(input: &str) -> Result<GridPoint, String> {
    let indices = input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>().map_err(|_| {
                format!(
                    "Invalid grid index '{}' in '{}'. Use non-negative integers, e.g. 5,5",
                    s, input
                )
            })
        })
        .collect::<Result<Vec<usize>, String>>()?;

    if indices.is_empty() {
        return Err(format!("Empty grid point '{}'", input));
    }

    Ok(GridPoint(indices))
}

/// 解析 `axis=value,...` 形式的物理值
pub fn parse_nearest(input: &str) -> Result<NearestPoint, String> {
    let pairs = input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Expected axis=value, got '{}'", pair))?;
            let value = value
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid value '{}' for axis '{}'", value, name))?;
            Ok((name.trim().to_string(), value))
        })
        .collect::<Result<Vec<(String, f64)>, String>>()?;

    if pairs.is_empty() {
        return Err(format!("Empty axis values '{}'", input));
    }

    Ok(NearestPoint(pairs))
}

/// sed 子命令参数
#[derive(Args, Debug)]
pub struct SedArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Grid point as comma separated indices, e.g. "5,5" (ia,iZ); repeat to add SEDs
    #[arg(short, long = "point", value_parser = parse_point)]
    pub points: Vec<GridPoint>,

    /// Grid point nearest to axis values, e.g. "log10age=7.0,metallicity=0.01"; repeatable
    #[arg(short, long, value_parser = parse_nearest)]
    pub nearest: Vec<NearestPoint>,

    /// Spectra type (default: stellar, or the first one in the grid)
    #[arg(short, long)]
    pub spectra: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}
