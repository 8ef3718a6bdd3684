//! # 光谱计算模块
//!
//! 提供积分 SED 计算、数据导出与绘图功能。
//!
//! ## 子模块
//! - `weights`: 粒子到网格的 cloud-in-cell 权重
//! - `integrated`: 积分 SED 计算器
//! - `export`: 数据导出
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/`

pub mod export;
pub mod integrated;
pub mod plot;
pub mod weights;

pub use integrated::IntegratedSedCalculator;
