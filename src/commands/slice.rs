//! # slice 子命令实现
//!
//! 从网格中抽取单一光谱类型，写出新的 .sedgrid 文件。
//!
//! ## 依赖关系
//! - 使用 `cli/grid.rs` 定义的 SliceArgs
//! - 使用 `parsers/sedgrid.rs` 写出网格

use crate::cli::grid::SliceArgs;
use crate::commands::common;
use crate::error::{Result, SedGridError};
use crate::parsers::sedgrid;
use crate::utils::output;

/// 执行 slice
pub fn execute(args: SliceArgs) -> Result<()> {
    output::print_header("Grid Slice");

    if args.output.exists() && !args.overwrite {
        return Err(SedGridError::InvalidArgument(format!(
            "output '{}' exists (use --overwrite)",
            args.output.display()
        )));
    }

    let grid = common::load_grid(&args.grid)?;
    let sliced = grid.select_spectra(&args.spectra)?;

    sedgrid::write_sedgrid_file(&sliced, &args.output)?;

    output::print_success(&format!(
        "Wrote '{}' spectra of '{}' to '{}'",
        args.spectra,
        grid.name,
        args.output.display()
    ));

    Ok(())
}
