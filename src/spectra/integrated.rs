//! # 积分 SED 计算器
//!
//! 将一组恒星粒子的网格权重与网格光谱相乘求和，得到整体 SED：
//! `Lν(λ) = Σ_cell w_cell · (1 - fesc) · spectra[cell, λ]`
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 调用
//! - 使用 `spectra/weights.rs` 计算网格权重
//! - 使用 `models/grid.rs`, `models/sed.rs`

use crate::error::{Result, SedGridError};
use crate::models::{Grid, Sed, StellarParticles};
use crate::spectra::weights;

/// 积分 SED 计算器
pub struct IntegratedSedCalculator<'a> {
    grid: &'a Grid,
    /// 使用的光谱类型
    spectra: String,
    /// 逃逸分数
    fesc: f64,
}

impl<'a> IntegratedSedCalculator<'a> {
    /// 创建计算器（默认光谱，fesc = 0）
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            spectra: grid.default_spectra().to_string(),
            fesc: 0.0,
        }
    }

    pub fn with_spectra(mut self, spectra: impl Into<String>) -> Self {
        self.spectra = spectra.into();
        self
    }

    pub fn with_fesc(mut self, fesc: f64) -> Self {
        self.fesc = fesc;
        self
    }

    /// 计算粒子集合的积分 SED
    pub fn calculate(&self, particles: &StellarParticles) -> Result<Sed> {
        if !(0.0..=1.0).contains(&self.fesc) {
            return Err(SedGridError::InvalidArgument(format!(
                "escape fraction must be within [0, 1], got {}",
                self.fesc
            )));
        }

        self.check_axes(particles)?;

        let block = self.grid.spectra_block(&self.spectra)?;
        let grid_weights = weights::compute_grid_weights(&self.grid.axes, particles)?;

        let nlam = self.grid.nlam();
        let transmitted = 1.0 - self.fesc;
        let mut lnu = vec![0.0; nlam];

        for (cell, &weight) in grid_weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            let row = &block[cell * nlam..(cell + 1) * nlam];
            for (out, value) in lnu.iter_mut().zip(row) {
                *out += value * transmitted * weight;
            }
        }

        Ok(Sed::new(self.grid.lam.clone(), lnu)?.with_description(format!(
            "{} {} integrated ({} particles)",
            self.grid.name,
            self.spectra,
            particles.len()
        )))
    }

    /// 粒子属性名须与网格轴一一对应
    fn check_axes(&self, particles: &StellarParticles) -> Result<()> {
        let grid_names: Vec<&str> = self.grid.axes.iter().map(|a| a.name.as_str()).collect();
        let matches = grid_names.len() == particles.axis_names.len()
            && grid_names
                .iter()
                .zip(&particles.axis_names)
                .all(|(g, p)| g.eq_ignore_ascii_case(p));

        if !matches {
            return Err(SedGridError::DimensionMismatch {
                expected: format!("particle properties [{}]", grid_names.join(", ")),
                got: format!("[{}]", particles.axis_names.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::tests::{small_grid, test_grid_dir};

    fn particles(masses: Vec<f64>, ages: Vec<f64>, metals: Vec<f64>) -> StellarParticles {
        StellarParticles::new(
            masses,
            vec!["log10age".to_string(), "metallicity".to_string()],
            vec![ages, metals],
        )
        .unwrap()
    }

    #[test]
    fn test_single_particle_on_grid_point() {
        let grid = small_grid();
        let p = particles(vec![2.0], vec![7.0], vec![0.01]);

        let sed = IntegratedSedCalculator::new(&grid)
            .with_fesc(0.25)
            .calculate(&p)
            .unwrap();
        let expected = grid.get_sed(1, 1).unwrap().scale(2.0 * 0.75);

        for (a, b) in sed.lnu().iter().zip(expected.lnu()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_integrated_equals_weighted_sum() {
        let grid = Grid::load("test_grid", &test_grid_dir()).unwrap();
        let ages = grid.axes[0].values.clone();
        let metals = grid.axes[1].values.clone();

        // 两个粒子恰好位于 (5,5) 与 (3,5)
        let p = particles(
            vec![1.0, 1.0],
            vec![ages[5], ages[3]],
            vec![metals[5], metals[5]],
        );
        let sed = IntegratedSedCalculator::new(&grid).calculate(&p).unwrap();
        let expected = (&grid.get_sed(5, 5).unwrap() + &grid.get_sed(3, 5).unwrap()).unwrap();

        for (a, b) in sed.lnu().iter().zip(expected.lnu()) {
            assert!((a - b).abs() <= 1e-9 * b.abs().max(1e-300));
        }
    }

    #[test]
    fn test_invalid_fesc_and_axes() {
        let grid = small_grid();
        let p = particles(vec![1.0], vec![6.5], vec![0.01]);

        assert!(IntegratedSedCalculator::new(&grid)
            .with_fesc(1.5)
            .calculate(&p)
            .is_err());
        assert!(IntegratedSedCalculator::new(&grid)
            .with_spectra("nebular")
            .calculate(&p)
            .is_err());

        let wrong = StellarParticles::new(
            vec![1.0],
            vec!["metallicity".to_string(), "log10age".to_string()],
            vec![vec![0.01], vec![6.5]],
        )
        .unwrap();
        assert!(matches!(
            IntegratedSedCalculator::new(&grid).calculate(&wrong),
            Err(SedGridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_full_escape_gives_zero() {
        let grid = small_grid();
        let p = particles(vec![3.0], vec![6.3], vec![0.015]);
        let sed = IntegratedSedCalculator::new(&grid)
            .with_fesc(1.0)
            .calculate(&p)
            .unwrap();
        assert!(sed.lnu().iter().all(|v| *v == 0.0));
    }
}
