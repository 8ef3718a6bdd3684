//! # 恒星粒子数据模型
//!
//! 一组恒星粒子的质量及其在各网格轴上的属性（如 log10age, metallicity）。
//!
//! ## 依赖关系
//! - 被 `parsers/particles.rs` 构造
//! - 被 `spectra/weights.rs`, `spectra/integrated.rs` 使用

use crate::error::{Result, SedGridError};

/// 恒星粒子集合
#[derive(Debug, Clone)]
pub struct StellarParticles {
    /// 粒子初始质量
    pub masses: Vec<f64>,
    /// 属性名称（与网格轴顺序一致）
    pub axis_names: Vec<String>,
    /// 每个轴一列属性值
    pub properties: Vec<Vec<f64>>,
}

impl StellarParticles {
    /// 创建并校验粒子集合
    pub fn new(masses: Vec<f64>, axis_names: Vec<String>, properties: Vec<Vec<f64>>) -> Result<Self> {
        if masses.is_empty() {
            return Err(SedGridError::InvalidArgument(
                "particle set is empty".to_string(),
            ));
        }
        if axis_names.len() != properties.len() {
            return Err(SedGridError::DimensionMismatch {
                expected: format!("{} property columns", axis_names.len()),
                got: format!("{} property columns", properties.len()),
            });
        }
        if masses.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(SedGridError::InvalidArgument(
                "particle masses must be finite and non-negative".to_string(),
            ));
        }
        for (name, column) in axis_names.iter().zip(&properties) {
            if column.len() != masses.len() {
                return Err(SedGridError::DimensionMismatch {
                    expected: format!("{} values for '{}'", masses.len(), name),
                    got: format!("{} values", column.len()),
                });
            }
            if column.iter().any(|v| !v.is_finite()) {
                return Err(SedGridError::InvalidArgument(format!(
                    "property '{}' contains non-finite values",
                    name
                )));
            }
        }

        Ok(Self {
            masses,
            axis_names,
            properties,
        })
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn ndim(&self) -> usize {
        self.properties.len()
    }

    pub fn total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// 第 p 个粒子的属性向量
    pub fn particle(&self, p: usize) -> Vec<f64> {
        self.properties.iter().map(|column| column[p]).collect()
    }
}
