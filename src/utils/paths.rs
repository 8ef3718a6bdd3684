//! # 路径解析工具
//!
//! 解析网格目录：命令行参数 / 环境变量优先，
//! 否则在程序自身所在位置查找 `test_grid`。
//!
//! ## 查找顺序
//! 1. 可执行文件所在目录下的 `tests/test_grid/`
//! 2. 可执行文件所在目录下的 `test_grid/`
//! 3. 构建时的源码目录 `CARGO_MANIFEST_DIR/tests/test_grid/`
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/grid.rs` 的扩展名常量

use crate::models::grid::GRID_EXTENSION;

use std::path::{Path, PathBuf};

/// 测试网格名称
pub const TEST_GRID_NAME: &str = "test_grid";

/// 构建时的源码目录
pub fn build_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// 可执行文件所在目录
pub fn program_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// 默认网格目录的候选列表（按优先级）
pub fn grid_dir_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = program_dir() {
        candidates.push(dir.join("tests").join(TEST_GRID_NAME));
        candidates.push(dir.join(TEST_GRID_NAME));
    }
    candidates.push(build_dir().join("tests").join(TEST_GRID_NAME));
    candidates
}

/// 默认网格目录：第一个包含 `test_grid.sedgrid` 的候选目录，
/// 都不存在时退回构建目录下的路径
pub fn default_grid_dir() -> PathBuf {
    let file_name = format!("{}.{}", TEST_GRID_NAME, GRID_EXTENSION);
    let candidates = grid_dir_candidates();

    candidates
        .iter()
        .find(|dir| dir.join(&file_name).is_file())
        .cloned()
        .unwrap_or_else(|| build_dir().join("tests").join(TEST_GRID_NAME))
}

/// 解析网格目录
pub fn resolve_grid_dir(grid_dir: Option<&Path>) -> PathBuf {
    match grid_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_grid_dir(),
    }
}
