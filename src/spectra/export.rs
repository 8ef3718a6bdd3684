//! # SED 数据导出
//!
//! 导出 SED 到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: `lam_angstrom, lnu, llam` 三列
//! - XY: `#` 注释头 + 制表符分隔的 `λ  Lν`
//!
//! ## 依赖关系
//! - 被 `commands/` 模块调用
//! - 使用 `models/sed.rs`
//! - 使用 `csv` + `serde` 写入 CSV 文件

use crate::error::{Result, SedGridError};
use crate::models::Sed;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV 输出行
#[derive(Debug, Serialize)]
struct SedRow {
    lam_angstrom: f64,
    lnu: f64,
    llam: f64,
}

/// 导出 SED 为 CSV 格式
pub fn to_csv(sed: &Sed, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let llam_values = sed.llam();
    for ((&lam, &lnu), &llam) in sed.lam().iter().zip(sed.lnu()).zip(&llam_values) {
        wtr.serialize(SedRow {
            lam_angstrom: lam,
            lnu,
            llam,
        })?;
    }

    wtr.flush().map_err(|e| SedGridError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出 SED 为 XY 格式
pub fn to_xy(sed: &Sed, output_path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| SedGridError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_err)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# SED: {}", sed.label()).map_err(write_err)?;
    writeln!(out, "# Points: {}", sed.len()).map_err(write_err)?;
    writeln!(out, "# Columns: wavelength (Angstrom), Lnu (erg/s/Hz)").map_err(write_err)?;
    writeln!(out, "#").map_err(write_err)?;

    for (lam, lnu) in sed.lam().iter().zip(sed.lnu()) {
        writeln!(out, "{:.4}\t{:.6e}", lam, lnu).map_err(write_err)?;
    }

    out.flush().map_err(write_err)?;

    Ok(())
}
