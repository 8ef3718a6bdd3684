//! # 恒星粒子 CSV 解析器
//!
//! 读取带表头的粒子 CSV：一列 `mass`，以及每个网格轴一列属性。
//!
//! ## 格式示例
//! ```text
//! mass,log10age,metallicity
//! 1.0e6,7.25,0.012
//! 2.5e5,8.10,0.004
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 使用
//! - 使用 `models/particles.rs`
//! - 使用 `csv` 库读取

use crate::error::{Result, SedGridError};
use crate::models::StellarParticles;

use std::io::Read;
use std::path::Path;

const FORMAT: &str = "particles csv";

/// 质量列名
pub const MASS_COLUMN: &str = "mass";

/// 解析粒子 CSV 文件，按 `axis_names` 的顺序提取属性列
pub fn parse_particles_file(path: &Path, axis_names: &[String]) -> Result<StellarParticles> {
    if !path.is_file() {
        return Err(SedGridError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| SedGridError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_particles_reader(file, axis_names, &path.display().to_string())
}

/// 从任意 reader 解析粒子 CSV
pub fn parse_particles_reader<R: Read>(
    reader: R,
    axis_names: &[String],
    source_name: &str,
) -> Result<StellarParticles> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find_column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| SedGridError::ParseError {
                format: FORMAT.to_string(),
                path: source_name.to_string(),
                reason: format!("Missing column '{}'", name),
            })
    };

    let mass_col = find_column(MASS_COLUMN)?;
    let prop_cols = axis_names
        .iter()
        .map(|name| find_column(name))
        .collect::<Result<Vec<usize>>>()?;

    let mut masses = Vec::new();
    let mut properties: Vec<Vec<f64>> = vec![Vec::new(); axis_names.len()];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |col: usize| -> Result<f64> {
            let raw = record.get(col).unwrap_or("");
            raw.parse::<f64>().map_err(|_| SedGridError::ParseError {
                format: FORMAT.to_string(),
                path: source_name.to_string(),
                reason: format!(
                    "Row {}: invalid value '{}' in column '{}'",
                    row + 1,
                    raw,
                    headers.get(col).unwrap_or("?")
                ),
            })
        };

        masses.push(field(mass_col)?);
        for (column, &col) in properties.iter_mut().zip(&prop_cols) {
            column.push(field(col)?);
        }
    }

    StellarParticles::new(masses, axis_names.to_vec(), properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_names() -> Vec<String> {
        vec!["log10age".to_string(), "metallicity".to_string()]
    }

    #[test]
    fn test_parse_particles() {
        let data = "id,metallicity,mass,log10age\n1,0.01,1e6,7.0\n2, 0.02 ,2e6,8.5\n";
        let particles = parse_particles_reader(data.as_bytes(), &axis_names(), "inline").unwrap();

        assert_eq!(particles.len(), 2);
        assert_eq!(particles.masses, vec![1e6, 2e6]);
        assert_eq!(particles.properties[0], vec![7.0, 8.5]);
        assert_eq!(particles.properties[1], vec![0.01, 0.02]);
    }

    #[test]
    fn test_parse_particles_missing_column() {
        let data = "mass,log10age\n1e6,7.0\n";
        let err = parse_particles_reader(data.as_bytes(), &axis_names(), "inline").unwrap_err();
        assert!(err.to_string().contains("inline"));
        match err {
            SedGridError::ParseError { reason, .. } => assert!(reason.contains("metallicity")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_particles_bad_value() {
        let data = "mass,log10age,metallicity\n1e6,old,0.01\n";
        assert!(parse_particles_reader(data.as_bytes(), &axis_names(), "inline").is_err());
    }

    #[test]
    fn test_parse_particles_empty() {
        let data = "mass,log10age,metallicity\n";
        assert!(parse_particles_reader(data.as_bytes(), &axis_names(), "inline").is_err());
    }
}
