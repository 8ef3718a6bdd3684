//! # integrate 子命令实现
//!
//! 读取恒星粒子 CSV，按 cloud-in-cell 权重计算积分 SED。
//!
//! ## 依赖关系
//! - 使用 `cli/integrate.rs` 定义的 IntegrateArgs
//! - 使用 `parsers/particles.rs` 读取粒子
//! - 使用 `spectra/integrated.rs` 计算

use crate::cli::integrate::IntegrateArgs;
use crate::commands::common;
use crate::error::Result;
use crate::parsers::particles;
use crate::spectra::IntegratedSedCalculator;
use crate::utils::output;

/// 执行 integrate
pub fn execute(args: IntegrateArgs) -> Result<()> {
    output::print_header("Integrated SED Calculation");

    let grid = common::load_grid(&args.grid)?;

    let axis_names: Vec<String> = grid.axes.iter().map(|a| a.name.clone()).collect();
    let stars = particles::parse_particles_file(&args.particles, &axis_names)?;
    output::print_success(&format!(
        "Loaded {} particles (total mass {:.4e})",
        stars.len(),
        stars.total_mass()
    ));

    let spectra = args
        .spectra
        .clone()
        .unwrap_or_else(|| grid.default_spectra().to_string());
    output::print_info(&format!(
        "Using '{}' spectra with fesc = {:.3}",
        spectra, args.fesc
    ));

    let sed = IntegratedSedCalculator::new(&grid)
        .with_spectra(spectra)
        .with_fesc(args.fesc)
        .calculate(&stars)?;

    output::print_success(&format!("Computed {}", sed.label()));
    common::print_sed_table("Integrated SED", &[&sed]);

    common::write_output(&sed, &[], &args.output)
}
