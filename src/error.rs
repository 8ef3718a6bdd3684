//! # 统一错误处理模块
//!
//! 定义 sedgrid 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// sedgrid 统一错误类型
#[derive(Error, Debug)]
pub enum SedGridError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Grid '{name}' not found in {dir}")]
    GridNotFound { name: String, dir: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    // ─────────────────────────────────────────────────────────────
    // 网格查询错误
    // ─────────────────────────────────────────────────────────────
    #[error("Index {index} out of range for axis '{axis}' (length {len})")]
    IndexOutOfRange {
        axis: String,
        index: usize,
        len: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Unknown spectra '{name}' (available: {available})")]
    UnknownSpectra { name: String, available: String },

    // ─────────────────────────────────────────────────────────────
    // SED 运算错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid SED: {0}")]
    InvalidSed(String),

    #[error("Incompatible SEDs: {0}")]
    IncompatibleSed(String),

    #[error("No wavelength points inside window {min}-{max} Å")]
    WindowOutOfRange { min: f64, max: f64 },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid grid point: {0}")]
    InvalidPoint(String),

    // ─────────────────────────────────────────────────────────────
    // CSV / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SedGridError>;
