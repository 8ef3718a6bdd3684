//! # sed 子命令实现
//!
//! 按网格下标或最近物理值获取 SED，逐点相加并输出。
//!
//! ## 依赖关系
//! - 使用 `cli/sed.rs` 定义的 SedArgs
//! - 使用 `models/grid.rs`, `models/sed.rs`
//! - 使用 `commands/common.rs` 输出结果

use crate::cli::sed::{NearestPoint, SedArgs};
use crate::commands::common;
use crate::error::{Result, SedGridError};
use crate::models::{Grid, Sed};
use crate::utils::output;

/// 执行 sed
pub fn execute(args: SedArgs) -> Result<()> {
    output::print_header("Grid SED Retrieval");

    if args.points.is_empty() && args.nearest.is_empty() {
        return Err(SedGridError::InvalidArgument(
            "at least one --point or --nearest is required".to_string(),
        ));
    }

    let grid = common::load_grid(&args.grid)?;
    let spectra = args
        .spectra
        .clone()
        .unwrap_or_else(|| grid.default_spectra().to_string());

    let mut seds = Vec::new();

    for point in &args.points {
        seds.push(grid.get_sed_at(&spectra, &point.0)?);
    }

    for nearest in &args.nearest {
        let indices = resolve_nearest(&grid, nearest)?;
        output::print_info(&format!(
            "Nearest grid point to {} is {:?}",
            describe_nearest(nearest),
            indices
        ));
        seds.push(grid.get_sed_at(&spectra, &indices)?);
    }

    let total = Sed::sum(&seds)?;

    if seds.len() > 1 {
        let labels: Vec<&str> = seds.iter().map(|s| s.label()).collect();
        output::print_combination(&labels, &format!("{} SEDs combined", seds.len()));
    } else {
        output::print_success(&format!("Retrieved {}", total.label()));
    }

    let mut table: Vec<&Sed> = seds.iter().collect();
    if seds.len() > 1 {
        table.push(&total);
    }
    common::print_sed_table("SED Summary", &table);

    let components: &[Sed] = if seds.len() > 1 { &seds } else { &[] };
    common::write_output(&total, components, &args.output)
}

/// 将 `axis=value` 列表解析为网格下标
pub fn resolve_nearest(grid: &Grid, nearest: &NearestPoint) -> Result<Vec<usize>> {
    for (name, _) in &nearest.0 {
        if grid.axis(name).is_none() {
            return Err(SedGridError::InvalidPoint(format!(
                "unknown axis '{}' (grid axes: {})",
                name,
                grid.axes
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }

    let values = grid
        .axes
        .iter()
        .map(|axis| {
            nearest
                .0
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&axis.name))
                .map(|(_, v)| *v)
                .ok_or_else(|| {
                    SedGridError::InvalidPoint(format!("missing value for axis '{}'", axis.name))
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    grid.get_nearest(&values)
}

fn describe_nearest(nearest: &NearestPoint) -> String {
    nearest
        .0
        .iter()
        .map(|(name, v)| format!("{}={}", name, v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::tests::small_grid;

    fn nearest(pairs: &[(&str, f64)]) -> NearestPoint {
        NearestPoint(pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect())
    }

    #[test]
    fn test_resolve_nearest() {
        let grid = small_grid();

        let indices =
            resolve_nearest(&grid, &nearest(&[("metallicity", 0.012), ("LOG10AGE", 6.9)])).unwrap();
        assert_eq!(indices, vec![1, 1]);
    }

    #[test]
    fn test_resolve_nearest_errors() {
        let grid = small_grid();

        assert!(matches!(
            resolve_nearest(&grid, &nearest(&[("log10age", 6.0)])),
            Err(SedGridError::InvalidPoint(_))
        ));
        assert!(matches!(
            resolve_nearest(
                &grid,
                &nearest(&[("log10age", 6.0), ("metallicity", 0.01), ("mass", 1.0)])
            ),
            Err(SedGridError::InvalidPoint(_))
        ));
    }
}
