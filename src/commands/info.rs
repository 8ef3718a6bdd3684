//! # info 子命令实现
//!
//! 显示网格的轴、波长覆盖与可用光谱类型。
//!
//! ## 依赖关系
//! - 使用 `cli/grid.rs` 定义的 InfoArgs
//! - 使用 `commands/common.rs` 加载网格

use crate::cli::grid::InfoArgs;
use crate::commands::common;
use crate::error::Result;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 轴信息行
#[derive(Debug, Clone, Tabled)]
struct AxisRow {
    #[tabled(rename = "Axis")]
    name: String,
    #[tabled(rename = "N")]
    len: usize,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
}

/// 执行 info
pub fn execute(args: InfoArgs) -> Result<()> {
    output::print_header("SED Grid Information");

    let grid = common::load_grid(&args.grid)?;

    let rows: Vec<AxisRow> = grid
        .axes
        .iter()
        .map(|axis| AxisRow {
            name: axis.name.clone(),
            len: axis.len(),
            min: format!("{}", axis.values[0]),
            max: format!("{}", axis.values[axis.len() - 1]),
        })
        .collect();

    output::print_header(&format!("Axes of '{}'", grid.name));
    println!("{}", Table::new(&rows));
    println!();

    output::print_info(&format!(
        "Wavelength: {} points, {:.1} - {:.1} Å",
        grid.nlam(),
        grid.lam[0],
        grid.lam[grid.nlam() - 1]
    ));
    output::print_info(&format!(
        "Spectra: {} (default: {})",
        grid.spectra_names().join(", "),
        grid.default_spectra()
    ));
    output::print_info(&format!("Grid points: {}", grid.size()));

    Ok(())
}
