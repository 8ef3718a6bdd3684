//! # SED 数据模型
//!
//! 光谱能量分布（Spectral Energy Distribution）值对象。
//!
//! ## 约定
//! - 波长 `lam` 单位为 Å，严格递增且为正
//! - 光度 `lnu` 为单位频率光度 Lν (erg/s/Hz)
//! - 两个 SED 相加要求波长网格一致，结果为逐点求和
//!
//! ## 依赖关系
//! - 被 `models/grid.rs`, `spectra/` 和 `commands/` 使用

use crate::error::{Result, SedGridError};

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// 光速 (Å/s)
pub const SPEED_OF_LIGHT_AA: f64 = 2.997_924_58e18;

/// 波长比较的相对容差
const LAM_TOLERANCE: f64 = 1e-10;

/// Balmer break 蓝端窗口 (Å)
pub const BALMER_BLUE_WINDOW: (f64, f64) = (3400.0, 3600.0);
/// Balmer break 红端窗口 (Å)
pub const BALMER_RED_WINDOW: (f64, f64) = (4150.0, 4250.0);
/// UV 斜率 β 拟合窗口 (Å)
pub const UV_SLOPE_WINDOW: (f64, f64) = (1250.0, 3000.0);

/// 光谱能量分布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sed {
    /// 波长 (Å)
    lam: Vec<f64>,
    /// 单位频率光度 Lν
    lnu: Vec<f64>,
    /// 描述（来源网格点等）
    pub description: Option<String>,
}

impl Sed {
    /// 创建 SED，校验波长网格与光度长度
    pub fn new(lam: Vec<f64>, lnu: Vec<f64>) -> Result<Self> {
        if lam.is_empty() {
            return Err(SedGridError::InvalidSed("empty wavelength array".to_string()));
        }
        if lam.len() != lnu.len() {
            return Err(SedGridError::InvalidSed(format!(
                "wavelength has {} points but lnu has {}",
                lam.len(),
                lnu.len()
            )));
        }
        if lam.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(SedGridError::InvalidSed(
                "wavelengths must be finite and positive".to_string(),
            ));
        }
        if lam.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SedGridError::InvalidSed(
                "wavelengths must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            lam,
            lnu,
            description: None,
        })
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn lam(&self) -> &[f64] {
        &self.lam
    }

    pub fn lnu(&self) -> &[f64] {
        &self.lnu
    }

    pub fn len(&self) -> usize {
        self.lam.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lam.is_empty()
    }

    /// 描述文本（无描述时为 "sed"）
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or("sed")
    }

    /// 频率 ν = c / λ (Hz)
    pub fn nu(&self) -> Vec<f64> {
        self.lam.iter().map(|l| SPEED_OF_LIGHT_AA / l).collect()
    }

    /// 单位波长光度 Lλ = Lν · c / λ²
    pub fn llam(&self) -> Vec<f64> {
        self.lam
            .iter()
            .zip(&self.lnu)
            .map(|(l, f)| f * SPEED_OF_LIGHT_AA / (l * l))
            .collect()
    }

    /// 热光度 ∫ Lν dν（梯形积分）
    pub fn bolometric_luminosity(&self) -> f64 {
        let nu = self.nu();
        trapezoid(&nu, &self.lnu).abs()
    }

    /// 窗口内平均 Lν（按频率加权）
    pub fn window_lnu(&self, lam_min: f64, lam_max: f64) -> Result<f64> {
        let (start, end) = self.window_bounds(lam_min, lam_max)?;

        if end - start == 1 {
            return Ok(self.lnu[start]);
        }

        let nu: Vec<f64> = self.lam[start..end]
            .iter()
            .map(|l| SPEED_OF_LIGHT_AA / l)
            .collect();
        let integral = trapezoid(&nu, &self.lnu[start..end]);
        let width = nu[nu.len() - 1] - nu[0];

        Ok(integral / width)
    }

    /// Balmer break：红端 / 蓝端窗口平均 Lν 之比
    pub fn balmer_break(&self) -> Result<f64> {
        let blue = self.window_lnu(BALMER_BLUE_WINDOW.0, BALMER_BLUE_WINDOW.1)?;
        let red = self.window_lnu(BALMER_RED_WINDOW.0, BALMER_RED_WINDOW.1)?;

        if blue == 0.0 {
            return Err(SedGridError::InvalidSed(
                "zero flux in Balmer blue window".to_string(),
            ));
        }

        Ok(red / blue)
    }

    /// UV 斜率 β：在 1250-3000 Å 内拟合 log Lλ = β log λ + c
    pub fn uv_slope(&self) -> Result<f64> {
        let (start, end) = self.window_bounds(UV_SLOPE_WINDOW.0, UV_SLOPE_WINDOW.1)?;
        let llam = self.llam();

        // 只使用正光度点
        let points: Vec<(f64, f64)> = (start..end)
            .filter(|&i| llam[i] > 0.0)
            .map(|i| (self.lam[i].log10(), llam[i].log10()))
            .collect();

        if points.len() < 2 {
            return Err(SedGridError::WindowOutOfRange {
                min: UV_SLOPE_WINDOW.0,
                max: UV_SLOPE_WINDOW.1,
            });
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (x, y) in &points {
            sxy += (x - mean_x) * (y - mean_y);
            sxx += (x - mean_x) * (x - mean_x);
        }

        Ok(sxy / sxx)
    }

    /// 按常数缩放
    pub fn scale(&self, factor: f64) -> Sed {
        Sed {
            lam: self.lam.clone(),
            lnu: self.lnu.iter().map(|f| f * factor).collect(),
            description: self.description.clone(),
        }
    }

    /// 检查两个 SED 是否共享同一波长网格
    pub fn is_compatible(&self, other: &Sed) -> bool {
        self.lam.len() == other.lam.len()
            && self
                .lam
                .iter()
                .zip(&other.lam)
                .all(|(a, b)| (a - b).abs() <= LAM_TOLERANCE * a.abs().max(b.abs()))
    }

    /// 对多个 SED 求和
    pub fn sum<'a, I>(seds: I) -> Result<Sed>
    where
        I: IntoIterator<Item = &'a Sed>,
    {
        let mut iter = seds.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| SedGridError::InvalidArgument("cannot sum zero SEDs".to_string()))?;

        iter.try_fold(first.clone(), |acc, sed| &acc + sed)
    }

    /// 窗口 [lam_min, lam_max] 内的下标范围
    fn window_bounds(&self, lam_min: f64, lam_max: f64) -> Result<(usize, usize)> {
        let start = self.lam.partition_point(|&l| l < lam_min);
        let end = self.lam.partition_point(|&l| l <= lam_max);

        if lam_max < lam_min || start >= end {
            return Err(SedGridError::WindowOutOfRange {
                min: lam_min,
                max: lam_max,
            });
        }

        Ok((start, end))
    }
}

impl Add for &Sed {
    type Output = Result<Sed>;

    fn add(self, other: Self) -> Result<Sed> {
        if self.lam.len() != other.lam.len() {
            return Err(SedGridError::IncompatibleSed(format!(
                "wavelength grids differ in length ({} vs {})",
                self.lam.len(),
                other.lam.len()
            )));
        }
        if !self.is_compatible(other) {
            return Err(SedGridError::IncompatibleSed(
                "wavelength grids differ".to_string(),
            ));
        }

        let lnu = self.lnu.iter().zip(&other.lnu).map(|(a, b)| a + b).collect();

        let description = match (&self.description, &other.description) {
            (Some(a), Some(b)) => Some(format!("{} + {}", a, b)),
            (Some(a), None) | (None, Some(a)) => Some(a.clone()),
            (None, None) => None,
        };

        Ok(Sed {
            lam: self.lam.clone(),
            lnu,
            description,
        })
    }
}

impl Add for Sed {
    type Output = Result<Sed>;

    fn add(self, other: Sed) -> Result<Sed> {
        &self + &other
    }
}

impl Mul<f64> for &Sed {
    type Output = Sed;

    fn mul(self, factor: f64) -> Sed {
        self.scale(factor)
    }
}

impl Mul<f64> for Sed {
    type Output = Sed;

    fn mul(self, factor: f64) -> Sed {
        self.scale(factor)
    }
}

/// 梯形积分 ∫ y dx（x 可递减）
fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum()
}
