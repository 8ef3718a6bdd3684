//! # demo 子命令实现
//!
//! 示例流程：
//! 1. 在可执行文件旁或构建目录中查找 `tests/test_grid/`
//! 2. 加载 `test_grid`
//! 3. 获取 (ia=5, iZ=5) 与 (ia=3, iZ=5) 处的恒星 SED
//! 4. 两者相加
//!
//! ## 依赖关系
//! - 使用 `cli/grid.rs` 定义的 DemoArgs
//! - 使用 `utils/paths.rs` 解析网格目录

use crate::cli::grid::DemoArgs;
use crate::commands::common;
use crate::error::{Result, SedGridError};
use crate::models::{Grid, Sed};
use crate::utils::{output, paths};

use std::path::Path;

/// 执行 demo
pub fn execute(args: DemoArgs) -> Result<()> {
    output::print_header("SED Grid Example");

    let grid_dir = paths::default_grid_dir();
    output::print_info(&format!("Grid directory: '{}'", grid_dir.display()));

    let (sed1, sed2, sed) = run_example(&grid_dir).map_err(|e| {
        if let SedGridError::GridNotFound { .. } = e {
            output::print_warning(
                "test_grid is looked up next to the executable, then in the build tree; \
                 copy tests/test_grid/ beside the binary when it has been moved",
            );
        }
        e
    })?;

    output::print_combination(&[sed1.label(), sed2.label()], "combined SED");
    common::print_sed_table("Example SEDs", &[&sed1, &sed2, &sed]);

    common::write_output(&sed, &[sed1, sed2], &args.output)
}

/// 加载测试网格，取两个网格点的 SED 并相加
pub fn run_example(grid_dir: &Path) -> Result<(Sed, Sed, Sed)> {
    let grid = Grid::load(paths::TEST_GRID_NAME, grid_dir)?;

    let sed1 = grid.get_sed(5, 5)?; // ia = 5, iZ = 5
    let sed2 = grid.get_sed(3, 5)?; // ia = 3, iZ = 5

    let sed = (&sed1 + &sed2)?;

    Ok((sed1, sed2, sed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SedGridError;

    #[test]
    fn test_run_example() {
        let (sed1, sed2, sed) = run_example(&paths::default_grid_dir()).unwrap();

        assert_eq!(sed.lam(), sed1.lam());
        for ((a, b), s) in sed1.lnu().iter().zip(sed2.lnu()).zip(sed.lnu()) {
            assert_eq!(a + b, *s);
        }
    }

    #[test]
    fn test_run_example_missing_dir() {
        assert!(matches!(
            run_example(Path::new("/nonexistent/test_grid")),
            Err(SedGridError::DirectoryNotFound { .. })
        ));
    }
}
