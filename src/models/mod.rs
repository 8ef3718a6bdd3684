//! # 数据模型模块
//!
//! 定义 SED 网格、SED 与恒星粒子的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `spectra/` 和 `commands/` 使用
//! - 子模块: grid, sed, particles

pub mod grid;
pub mod particles;
pub mod sed;

pub use grid::{Grid, GridAxis};
pub use particles::StellarParticles;
pub use sed::Sed;
