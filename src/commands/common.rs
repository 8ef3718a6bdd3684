//! # 命令共享逻辑
//!
//! 网格加载、SED 汇总表格与结果输出。
//!
//! ## 依赖关系
//! - 被 `commands/` 下各子命令使用
//! - 使用 `spectra/export.rs`, `spectra/plot.rs`
//! - 使用 `tabled` 打印表格

use crate::cli::{GridArgs, OutputArgs, SedOutputFormat};
use crate::error::Result;
use crate::models::{Grid, Sed};
use crate::spectra::{export, plot};
use crate::utils::{output, paths};

use tabled::{Table, Tabled};

/// SED 汇总行
#[derive(Debug, Clone, Tabled)]
struct SedRow {
    #[tabled(rename = "SED")]
    label: String,
    #[tabled(rename = "λ range (Å)")]
    lam_range: String,
    #[tabled(rename = "L_bol (erg/s)")]
    bolometric: String,
    #[tabled(rename = "Balmer break")]
    balmer_break: String,
    #[tabled(rename = "β")]
    beta: String,
}

impl SedRow {
    fn from_sed(sed: &Sed) -> Self {
        let lam = sed.lam();
        SedRow {
            label: sed.label().to_string(),
            lam_range: format!("{:.1} - {:.1}", lam[0], lam[lam.len() - 1]),
            bolometric: format!("{:.4e}", sed.bolometric_luminosity()),
            balmer_break: sed
                .balmer_break()
                .map(|b| format!("{:.3}", b))
                .unwrap_or_else(|_| "-".to_string()),
            beta: sed
                .uv_slope()
                .map(|b| format!("{:.3}", b))
                .unwrap_or_else(|_| "-".to_string()),
        }
    }
}

/// 按参数解析目录并加载网格
pub fn load_grid(args: &GridArgs) -> Result<Grid> {
    let grid_dir = paths::resolve_grid_dir(args.grid_dir());
    output::print_info(&format!(
        "Loading grid '{}' from '{}'",
        args.grid,
        grid_dir.display()
    ));

    let grid = Grid::load(&args.grid, &grid_dir)?;

    let shape = grid
        .axes
        .iter()
        .map(|a| format!("{}={}", a.name, a.len()))
        .collect::<Vec<_>>()
        .join(", ");
    output::print_success(&format!(
        "Loaded grid '{}' ({}; {} wavelengths)",
        grid.name,
        shape,
        grid.nlam()
    ));

    Ok(grid)
}

/// 打印 SED 汇总表
pub fn print_sed_table(title: &str, seds: &[&Sed]) {
    let rows: Vec<SedRow> = seds.iter().map(|s| SedRow::from_sed(s)).collect();
    if rows.is_empty() {
        return;
    }

    output::print_header(title);
    println!("{}", Table::new(&rows));
}

/// 按输出参数写出 SED（数据文件或图像）
pub fn write_output(sed: &Sed, components: &[Sed], args: &OutputArgs) -> Result<()> {
    let Some(path) = args.output.as_deref() else {
        return Ok(());
    };

    let format = args
        .format
        .unwrap_or_else(|| SedOutputFormat::from_extension(path));

    match format {
        SedOutputFormat::Csv => export::to_csv(sed, path)?,
        SedOutputFormat::Xy => export::to_xy(sed, path)?,
        SedOutputFormat::Png | SedOutputFormat::Svg => {
            let title = args.title.clone().unwrap_or_else(|| sed.label().to_string());
            plot::generate_sed_plot(
                sed,
                components,
                path,
                &title,
                args.width,
                args.height,
                format == SedOutputFormat::Svg,
            )?;
        }
    }

    output::print_success(&format!("SED saved to '{}'", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SedGridError;

    #[test]
    fn test_sed_row_without_windows() {
        // 波长覆盖不到 Balmer/UV 窗口时以 "-" 显示
        let sed = Sed::new(vec![10000.0, 20000.0], vec![1.0, 1.0]).unwrap();
        let row = SedRow::from_sed(&sed);
        assert_eq!(row.balmer_break, "-");
        assert_eq!(row.beta, "-");
        assert_eq!(row.label, "sed");
    }

    #[test]
    fn test_write_output_csv() {
        let path = std::env::temp_dir().join(format!("sedgrid_{}_common.csv", std::process::id()));
        let sed = Sed::new(vec![1000.0, 2000.0], vec![1.0, 2.0]).unwrap();
        let args = OutputArgs {
            output: Some(path.clone()),
            format: None,
            width: 800,
            height: 600,
            title: None,
        };

        write_output(&sed, &[], &args).unwrap();
        assert!(path.is_file());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_output_svg_by_extension() {
        let path = std::env::temp_dir().join(format!("sedgrid_{}_common.svg", std::process::id()));
        let sed = Sed::new(vec![1000.0, 2000.0, 3000.0], vec![1.0, 2.0, 3.0]).unwrap();
        let args = OutputArgs {
            output: Some(path.clone()),
            format: None,
            width: 400,
            height: 300,
            title: Some("svg".to_string()),
        };

        match write_output(&sed, &[], &args) {
            Ok(()) => {
                let content = std::fs::read_to_string(&path).unwrap();
                assert!(content.contains("<svg"));
            }
            Err(SedGridError::PlotError(msg)) if msg.contains("Font") => {}
            Err(e) => panic!("svg output failed: {}", e),
        }
        std::fs::remove_file(&path).ok();
    }
}
