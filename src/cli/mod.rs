//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `info`: 显示网格轴、波长范围与光谱类型
//! - `sed`: 获取网格点 SED 并求和
//! - `integrate`: 计算恒星粒子的积分 SED
//! - `slice`: 抽取单一光谱类型写出新网格
//! - `check`: 并行检查目录中的网格文件
//! - `demo`: 示例流程（test_grid 上 (5,5) + (3,5)）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: grid, sed, integrate, check

pub mod check;
pub mod grid;
pub mod integrate;
pub mod sed;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// sedgrid - 恒星族群光谱网格工具
#[derive(Parser)]
#[command(name = "sedgrid")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Load precomputed stellar population grids and combine synthetic SEDs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Show grid axes, wavelength coverage and available spectra
    Info(grid::InfoArgs),

    /// Retrieve SEDs at grid points and add them together
    Sed(sed::SedArgs),

    /// Compute the integrated SED of a set of star particles
    Integrate(integrate::IntegrateArgs),

    /// Write a copy of a grid containing a single spectra type
    Slice(grid::SliceArgs),

    /// Validate every grid file in a directory
    Check(check::CheckArgs),

    /// Run the example: test_grid SED at (5,5) plus SED at (3,5)
    Demo(grid::DemoArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 网格定位参数
#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Grid name (the file <grid-dir>/<grid>.sedgrid is loaded)
    #[arg(short, long, env = "SEDGRID_GRID", default_value = "test_grid")]
    pub grid: String,

    /// Directory containing the grid (default: tests/test_grid next to the program)
    #[arg(long, env = "SEDGRID_GRID_DIR")]
    pub grid_dir: Option<PathBuf>,
}

impl GridArgs {
    /// 显式给定的网格目录
    pub fn grid_dir(&self) -> Option<&Path> {
        self.grid_dir.as_deref()
    }
}

/// SED 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SedOutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (wavelength, Lnu, Llam)
    Csv,
    /// XY data file (wavelength, Lnu)
    Xy,
}

impl SedOutputFormat {
    /// 从文件扩展名推断输出格式
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("png") => SedOutputFormat::Png,
            Some("svg") => SedOutputFormat::Svg,
            Some("xy") | Some("dat") | Some("txt") => SedOutputFormat::Xy,
            _ => SedOutputFormat::Csv,
        }
    }
}

/// 输出参数
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file for the resulting SED (format from extension unless --format is given)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<SedOutputFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: SED description)
    #[arg(long)]
    pub title: Option<String>,
}
