//! # 网格权重计算（cloud-in-cell）
//!
//! 将每个粒子的质量线性分配到其所在网格单元的 2^ndim 个角点上。
//!
//! ## 算法概述
//! 1. 对每个轴二分查找 `low`，使 `axis[low] < v <= axis[low+1]`
//! 2. 计算高侧分数 `frac = (v - axis[low]) / (axis[low+1] - axis[low])`
//! 3. 超出轴范围的值钳制到边界点（分数为 0）
//! 4. 角点权重 = mass × Π (bit ? frac : 1 - frac)，零权重角点跳过
//!
//! ## 依赖关系
//! - 被 `spectra/integrated.rs` 调用
//! - 使用 `rayon` 并行累加

use crate::error::{Result, SedGridError};
use crate::models::{GridAxis, StellarParticles};

use rayon::prelude::*;

/// 单个轴上的 (低侧下标, 高侧分数)
pub fn axis_fraction(axis: &[f64], value: f64) -> (usize, f64) {
    let n = axis.len();

    if n <= 1 || value <= axis[0] {
        return (0, 0.0);
    }
    if value >= axis[n - 1] {
        return (n - 1, 0.0);
    }

    let high = axis.partition_point(|&a| a < value);
    let low = high - 1;
    let frac = (value - axis[low]) / (axis[high] - axis[low]);

    (low, frac)
}

/// 将单个粒子的权重累加到展平的网格权重数组
pub fn add_particle_weights(axes: &[GridAxis], point: &[f64], mass: f64, weights: &mut [f64]) {
    let fractions: Vec<(usize, f64)> = axes
        .iter()
        .zip(point)
        .map(|(axis, &v)| axis_fraction(&axis.values, v))
        .collect();

    for corner in 0..(1usize << axes.len()) {
        let mut weight = mass;
        let mut flat = 0;
        let mut in_grid = true;

        for (dim, (axis, &(low, frac))) in axes.iter().zip(&fractions).enumerate() {
            let bit = (corner >> dim) & 1;
            weight *= if bit == 1 { frac } else { 1.0 - frac };

            let index = low + bit;
            if index >= axis.len() {
                in_grid = false;
                break;
            }
            flat = flat * axis.len() + index;
        }

        if !in_grid || weight == 0.0 {
            continue;
        }

        weights[flat] += weight;
    }
}

/// 计算所有粒子在网格上的总权重（并行）
pub fn compute_grid_weights(axes: &[GridAxis], particles: &StellarParticles) -> Result<Vec<f64>> {
    if axes.len() != particles.ndim() {
        return Err(SedGridError::DimensionMismatch {
            expected: format!("{} particle properties", axes.len()),
            got: format!("{} particle properties", particles.ndim()),
        });
    }

    let size: usize = axes.iter().map(|a| a.len()).product();

    let weights = (0..particles.len())
        .into_par_iter()
        .fold(
            || vec![0.0; size],
            |mut acc, p| {
                let point = particles.particle(p);
                add_particle_weights(axes, &point, particles.masses[p], &mut acc);
                acc
            },
        )
        .reduce(
            || vec![0.0; size],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );

    Ok(weights)
}
