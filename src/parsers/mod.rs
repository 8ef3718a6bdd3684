//! # 解析器模块
//!
//! 提供 SED 网格文件与恒星粒子 CSV 的解析器。
//!
//! ## 依赖关系
//! - 被 `models/grid.rs` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: sedgrid, particles

pub mod particles;
pub mod sedgrid;
