//! # SED 图表生成
//!
//! 使用 `plotters` 库生成对数坐标的 SED 图（Lν vs λ）。
//!
//! ## 功能
//! - 双对数坐标
//! - 可叠加各分量 SED（如相加前的各网格点）
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/` 模块调用
//! - 使用 `models/sed.rs`
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, SedGridError};
use crate::models::Sed;

use plotters::prelude::*;
use std::path::Path;

/// 分量曲线配色
const COMPONENT_COLORS: [RGBColor; 4] = [
    RGBColor(230, 97, 1),
    RGBColor(94, 60, 153),
    RGBColor(27, 158, 119),
    RGBColor(200, 30, 80),
];

/// 生成 SED 图表
pub fn generate_sed_plot(
    sed: &Sed,
    components: &[Sed],
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_sed_chart(&root, sed, components, title)?;
        root.present()
            .map_err(|e| SedGridError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_sed_chart(&root, sed, components, title)?;
        root.present()
            .map_err(|e| SedGridError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 正光度的数据点（对数坐标只能画正值）
fn positive_points(sed: &Sed) -> Vec<(f64, f64)> {
    sed.lam()
        .iter()
        .zip(sed.lnu())
        .filter(|(_, f)| **f > 0.0)
        .map(|(l, f)| (*l, *f))
        .collect()
}

/// 绘制图表的核心逻辑
fn draw_sed_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    sed: &Sed,
    components: &[Sed],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| SedGridError::PlotError(format!("{:?}", e)))?;

    let points = positive_points(sed);
    if points.is_empty() {
        return Err(SedGridError::PlotError(
            "SED has no positive values to plot on a log scale".to_string(),
        ));
    }

    let component_points: Vec<Vec<(f64, f64)>> = components.iter().map(positive_points).collect();

    let all = points.iter().chain(component_points.iter().flatten());
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (_, y) in all {
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    // 留出上下边距
    let y_min = y_min / 3.0;
    let y_max = y_max * 3.0;

    let x_min = sed.lam()[0];
    let x_max = sed.lam()[sed.len() - 1].max(x_min * 1.01);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())
        .map_err(|e| SedGridError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("λ (Å)")
        .y_desc("Lν (erg/s/Hz)")
        .y_label_formatter(&|y| format!("{:.0e}", y))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| SedGridError::PlotError(format!("{:?}", e)))?;

    for (i, (component, data)) in components.iter().zip(&component_points).enumerate() {
        let color = COMPONENT_COLORS[i % COMPONENT_COLORS.len()];
        chart
            .draw_series(LineSeries::new(data.iter().copied(), color.stroke_width(1)))
            .map_err(|e| SedGridError::PlotError(format!("{:?}", e)))?
            .label(component.label().to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(points, line_color.stroke_width(2)))
        .map_err(|e| SedGridError::PlotError(format!("{:?}", e)))?
        .label(sed.label().to_string())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| SedGridError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sedgrid_{}_{}", std::process::id(), name))
    }

    fn power_law(scale: f64) -> Sed {
        let lam: Vec<f64> = (0..50).map(|i| 1000.0 + 100.0 * i as f64).collect();
        let lnu = lam.iter().map(|l| scale * (l / 1000.0).powf(1.5)).collect();
        Sed::new(lam, lnu).unwrap()
    }

    #[test]
    fn test_svg_render() {
        let path = temp_path("plot.svg");
        let a = power_law(1.0).with_description("a");
        let b = power_law(2.0).with_description("b");
        let total = (&a + &b).unwrap();

        let result = generate_sed_plot(&total, &[a, b], &path, "a + b", 640, 480, true);
        match result {
            Ok(()) => {
                let content = fs::read_to_string(&path).unwrap();
                assert!(content.contains("<svg"));
                assert!(content.contains("polyline") || content.contains("path"));
            }
            // 无系统字体的环境下文字排版失败
            Err(SedGridError::PlotError(msg)) if msg.contains("Font") => {}
            Err(e) => panic!("plot failed: {}", e),
        }

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_plot_requires_positive_values() {
        let path = temp_path("empty.svg");
        let sed = Sed::new(vec![1000.0, 2000.0], vec![0.0, -1.0]).unwrap();

        assert!(matches!(
            generate_sed_plot(&sed, &[], &path, "empty", 320, 240, true),
            Err(SedGridError::PlotError(_))
        ));

        fs::remove_file(&path).ok();
    }
}
