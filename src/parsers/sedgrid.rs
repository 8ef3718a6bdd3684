//! # .sedgrid 网格格式解析器
//!
//! 解析与写出 SED 网格文件。
//!
//! ## .sedgrid 格式说明
//! ```text
//! # 注释行（# 或 !）
//! %BLOCK AXES
//! log10age     6.0 6.5 7.0
//! metallicity  0.001 0.01
//! %ENDBLOCK AXES
//!
//! %BLOCK WAVELENGTH
//! ang
//! 1000.0 1050.0 1100.0 ...
//! %ENDBLOCK WAVELENGTH
//!
//! %BLOCK SPECTRA stellar
//! 0 0  v1 v2 ... v_nlam
//! ...
//! %ENDBLOCK SPECTRA
//! ```
//!
//! ## 依赖关系
//! - 被 `models/grid.rs` 使用
//! - 使用 `regex` 匹配块头

use crate::error::{Result, SedGridError};
use crate::models::grid::{checked_grid_size, DEFAULT_SPECTRA};
use crate::models::{Grid, GridAxis};

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const FORMAT: &str = "sedgrid";

/// 每行写出的波长数
const VALUES_PER_LINE: usize = 8;

/// 解析得到的原始块
struct Block<'a> {
    kind: String,
    arg: Option<String>,
    /// (行号, 内容)
    lines: Vec<(usize, &'a str)>,
}

/// 解析 .sedgrid 文件
pub fn parse_sedgrid_file(path: &Path, name: &str) -> Result<Grid> {
    let content = fs::read_to_string(path).map_err(|e| SedGridError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let grid_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_sedgrid_content(&content, name, grid_dir).map_err(|e| match e {
        SedGridError::ParseError { format, reason, .. } => SedGridError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 从字符串内容解析 .sedgrid 格式
pub fn parse_sedgrid_content(content: &str, name: &str, grid_dir: &Path) -> Result<Grid> {
    let blocks = split_blocks(content, name)?;

    if let Some(unknown) = blocks
        .iter()
        .find(|b| !matches!(b.kind.as_str(), "AXES" | "WAVELENGTH" | "SPECTRA"))
    {
        return Err(parse_error(name, format!("Unknown block {}", unknown.kind)));
    }

    let axes_block = blocks
        .iter()
        .find(|b| b.kind == "AXES")
        .ok_or_else(|| parse_error(name, "Missing AXES block".to_string()))?;
    let axes = parse_axes(axes_block, name)?;

    let lam_block = blocks
        .iter()
        .find(|b| b.kind == "WAVELENGTH")
        .ok_or_else(|| parse_error(name, "Missing WAVELENGTH block".to_string()))?;
    let lam = parse_wavelength(lam_block, name)?;

    let mut spectra = BTreeMap::new();
    for block in blocks.iter().filter(|b| b.kind == "SPECTRA") {
        let spec_name = block
            .arg
            .clone()
            .unwrap_or_else(|| DEFAULT_SPECTRA.to_string());
        if spectra.contains_key(&spec_name) {
            return Err(parse_error(
                name,
                format!("Duplicate SPECTRA block '{}'", spec_name),
            ));
        }
        let data = parse_spectra(block, &axes, lam.len(), name)?;
        spectra.insert(spec_name, data);
    }

    if spectra.is_empty() {
        return Err(parse_error(name, "Missing SPECTRA block".to_string()));
    }

    Grid::from_parts(name, grid_dir, axes, lam, spectra).map_err(|e| match e {
        SedGridError::InvalidGrid(reason) => parse_error(name, reason),
        other => other,
    })
}

/// 将内容切分为 %BLOCK ... %ENDBLOCK 块
fn split_blocks<'a>(content: &'a str, name: &str) -> Result<Vec<Block<'a>>> {
    let block_re = Regex::new(r"(?i)^%BLOCK\s+(\w+)(?:\s+(\S+))?\s*$").unwrap();
    let end_re = Regex::new(r"(?i)^%ENDBLOCK\s+(\w+)\s*$").unwrap();

    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        if let Some(caps) = block_re.captures(line) {
            if let Some(open) = &current {
                return Err(parse_error(
                    name,
                    format!(
                        "Line {}: %BLOCK inside unterminated block {}",
                        line_no, open.kind
                    ),
                ));
            }
            current = Some(Block {
                kind: caps[1].to_uppercase(),
                arg: caps.get(2).map(|m| m.as_str().to_string()),
                lines: Vec::new(),
            });
            continue;
        }

        if let Some(caps) = end_re.captures(line) {
            let block = current.take().ok_or_else(|| {
                parse_error(name, format!("Line {}: %ENDBLOCK without %BLOCK", line_no))
            })?;
            if caps[1].to_uppercase() != block.kind {
                return Err(parse_error(
                    name,
                    format!(
                        "Line {}: %ENDBLOCK {} does not close block {}",
                        line_no, &caps[1], block.kind
                    ),
                ));
            }
            blocks.push(block);
            continue;
        }

        match current.as_mut() {
            Some(block) => block.lines.push((line_no, line)),
            None => {
                return Err(parse_error(
                    name,
                    format!("Line {}: content outside of any block", line_no),
                ))
            }
        }
    }

    if let Some(open) = current {
        return Err(parse_error(
            name,
            format!("Unterminated block {}", open.kind),
        ));
    }

    Ok(blocks)
}

/// 解析 AXES 块
fn parse_axes(block: &Block, name: &str) -> Result<Vec<GridAxis>> {
    let mut axes = Vec::new();

    for &(line_no, line) in &block.lines {
        let mut tokens = line.split_whitespace();
        let axis_name = tokens.next().unwrap_or_default();
        let values = tokens
            .map(|t| parse_f64(t, line_no, name))
            .collect::<Result<Vec<f64>>>()?;

        if values.is_empty() {
            return Err(parse_error(
                name,
                format!("Line {}: axis '{}' has no values", line_no, axis_name),
            ));
        }
        if axes.iter().any(|a: &GridAxis| a.name.eq_ignore_ascii_case(axis_name)) {
            return Err(parse_error(
                name,
                format!("Line {}: duplicate axis '{}'", line_no, axis_name),
            ));
        }
        axes.push(GridAxis::new(axis_name, values));
    }

    if axes.is_empty() {
        return Err(parse_error(name, "AXES block is empty".to_string()));
    }

    Ok(axes)
}

/// 解析 WAVELENGTH 块（可选单位行）
fn parse_wavelength(block: &Block, name: &str) -> Result<Vec<f64>> {
    let mut factor = 1.0;
    let mut lam = Vec::new();

    for (idx, &(line_no, line)) in block.lines.iter().enumerate() {
        if idx == 0 {
            if let Some(f) = unit_factor(line) {
                factor = f;
                continue;
            }
        }
        for token in line.split_whitespace() {
            lam.push(parse_f64(token, line_no, name)? * factor);
        }
    }

    if lam.is_empty() {
        return Err(parse_error(name, "WAVELENGTH block is empty".to_string()));
    }

    Ok(lam)
}

/// 波长单位换算到 Å
fn unit_factor(line: &str) -> Option<f64> {
    match line.to_lowercase().as_str() {
        "ang" | "angstrom" | "aa" => Some(1.0),
        "nm" => Some(10.0),
        "um" | "micron" => Some(1.0e4),
        _ => None,
    }
}

/// 解析 SPECTRA 块：每行 ndim 个下标加 nlam 个数值
fn parse_spectra(block: &Block, axes: &[GridAxis], nlam: usize, name: &str) -> Result<Vec<f64>> {
    let ndim = axes.len();
    let spec_name = block.arg.as_deref().unwrap_or(DEFAULT_SPECTRA);
    let (npoints, size) = checked_grid_size(axes, 1)
        .zip(checked_grid_size(axes, nlam))
        .ok_or_else(|| parse_error(name, "Grid shape is too large".to_string()))?;

    // 行数须不少于网格点数
    if block.lines.len() < npoints {
        return Err(parse_error(
            name,
            format!(
                "SPECTRA block '{}' is missing {} of {} grid points",
                spec_name,
                npoints - block.lines.len(),
                npoints
            ),
        ));
    }

    let mut data = vec![0.0; size];
    let mut seen = vec![false; npoints];

    for &(line_no, line) in &block.lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != ndim + nlam {
            return Err(parse_error(
                name,
                format!(
                    "Line {}: expected {} indices and {} values, found {} fields",
                    line_no,
                    ndim,
                    nlam,
                    tokens.len()
                ),
            ));
        }

        let mut flat = 0;
        for (axis, token) in axes.iter().zip(&tokens[..ndim]) {
            let index: usize = token.parse().map_err(|_| {
                parse_error(
                    name,
                    format!("Line {}: invalid grid index '{}'", line_no, token),
                )
            })?;
            if index >= axis.len() {
                return Err(parse_error(
                    name,
                    format!(
                        "Line {}: index {} out of range for axis '{}' (length {})",
                        line_no,
                        index,
                        axis.name,
                        axis.len()
                    ),
                ));
            }
            flat = flat * axis.len() + index;
        }

        if seen[flat] {
            return Err(parse_error(
                name,
                format!("Line {}: duplicate grid point", line_no),
            ));
        }
        seen[flat] = true;

        let start = flat * nlam;
        for (offset, token) in tokens[ndim..].iter().enumerate() {
            data[start + offset] = parse_f64(token, line_no, name)?;
        }
    }

    let missing = seen.iter().filter(|s| !**s).count();
    if missing > 0 {
        return Err(parse_error(
            name,
            format!(
                "SPECTRA block '{}' is missing {} of {} grid points",
                spec_name,
                missing,
                npoints
            ),
        ));
    }

    Ok(data)
}

/// 将网格写为 .sedgrid 字符串
pub fn to_sedgrid_string(grid: &Grid) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# SED grid: {}", grid.name);
    let _ = writeln!(
        out,
        "# Shape: {} x {} wavelengths",
        grid.shape()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" x "),
        grid.nlam()
    );
    out.push('\n');

    out.push_str("%BLOCK AXES\n");
    for axis in &grid.axes {
        let values: Vec<String> = axis.values.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{} {}", axis.name, values.join(" "));
    }
    out.push_str("%ENDBLOCK AXES\n\n");

    out.push_str("%BLOCK WAVELENGTH\nang\n");
    for chunk in grid.lam.chunks(VALUES_PER_LINE) {
        let values: Vec<String> = chunk.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}", values.join(" "));
    }
    out.push_str("%ENDBLOCK WAVELENGTH\n");

    let shape = grid.shape();
    let nlam = grid.nlam();
    for spec_name in grid.spectra_names() {
        let Ok(block) = grid.spectra_block(spec_name) else {
            continue;
        };

        let _ = writeln!(out, "\n%BLOCK SPECTRA {}", spec_name);
        for flat in 0..grid.size() {
            let indices = unravel_index(flat, &shape);
            let values: Vec<String> = block[flat * nlam..(flat + 1) * nlam]
                .iter()
                .map(|v| format!("{:e}", v))
                .collect();
            let index_str: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
            let _ = writeln!(out, "{}  {}", index_str.join(" "), values.join(" "));
        }
        out.push_str("%ENDBLOCK SPECTRA\n");
    }

    out
}

/// 写出 .sedgrid 文件
pub fn write_sedgrid_file(grid: &Grid, path: &Path) -> Result<()> {
    fs::write(path, to_sedgrid_string(grid)).map_err(|e| SedGridError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 行主序展平下标还原为多维下标
pub fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    for (dim, &n) in shape.iter().enumerate().rev() {
        indices[dim] = flat % n;
        flat /= n;
    }
    indices
}

fn parse_f64(token: &str, line_no: usize, name: &str) -> Result<f64> {
    token.parse().map_err(|_| {
        parse_error(
            name,
            format!("Line {}: invalid number '{}'", line_no, token),
        )
    })
}

fn parse_error(name: &str, reason: String) -> SedGridError {
    SedGridError::ParseError {
        format: FORMAT.to_string(),
        path: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"# tiny grid
%BLOCK AXES
log10age 6.0 7.0
metallicity 0.01 0.02 0.03
%ENDBLOCK AXES

%block wavelength
nm
100 200
%endblock wavelength

%BLOCK SPECTRA
0 0  1.0 2.0
0 1  3.0 4.0
0 2  5.0 6.0
1 0  7.0 8.0
1 1  9.0 10.0
1 2  11.0 12.0
%ENDBLOCK SPECTRA

%BLOCK SPECTRA nebular
1 2  0.5 0.5
1 1  0.5 0.5
1 0  0.5 0.5
0 2  0.5 0.5
0 1  0.5 0.5
0 0  0.25 0.5
%ENDBLOCK SPECTRA
"#;

    #[test]
    fn test_parse_small_grid() {
        let grid = parse_sedgrid_content(SMALL, "small", Path::new(".")).unwrap();

        assert_eq!(grid.shape(), vec![2, 3]);
        assert_eq!(grid.lam, vec![1000.0, 2000.0]);
        assert_eq!(grid.spectra_names(), vec!["nebular", "stellar"]);

        let sed = grid.get_sed(1, 1).unwrap();
        assert_eq!(sed.lnu(), &[9.0, 10.0]);

        let neb = grid.get_sed_at("nebular", &[0, 0]).unwrap();
        assert_eq!(neb.lnu(), &[0.25, 0.5]);
    }

    #[test]
    fn test_parse_missing_point() {
        let content = SMALL.replace("1 2  11.0 12.0\n", "");
        let err = parse_sedgrid_content(&content, "small", Path::new(".")).unwrap_err();
        match err {
            SedGridError::ParseError { reason, .. } => assert!(reason.contains("missing 1 of 6")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_rows() {
        let dup = SMALL.replace("1 2  11.0 12.0", "1 1  11.0 12.0");
        assert!(parse_sedgrid_content(&dup, "small", Path::new(".")).is_err());

        let short = SMALL.replace("1 2  11.0 12.0", "1 2  11.0");
        assert!(parse_sedgrid_content(&short, "small", Path::new(".")).is_err());

        let out_of_range = SMALL.replace("1 2  11.0 12.0", "1 3  11.0 12.0");
        assert!(parse_sedgrid_content(&out_of_range, "small", Path::new(".")).is_err());

        let bad_number = SMALL.replace("11.0 12.0", "11.0 abc");
        assert!(parse_sedgrid_content(&bad_number, "small", Path::new(".")).is_err());
    }

    #[test]
    fn test_parse_unknown_block() {
        let content = format!("{}%BLOCK LATTICE\n1 0 0\n%ENDBLOCK LATTICE\n", SMALL);
        match parse_sedgrid_content(&content, "small", Path::new(".")) {
            Err(SedGridError::ParseError { reason, .. }) => assert!(reason.contains("LATTICE")),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wavelength_units() {
        for unit in ["um", "micron"] {
            let content = SMALL.replace("nm\n100 200", &format!("{}\n0.1 0.2", unit));
            let grid = parse_sedgrid_content(&content, "small", Path::new(".")).unwrap();
            assert_eq!(grid.lam, vec![1000.0, 2000.0]);
        }

        let content = SMALL.replace("nm\n100 200", "1000 2000");
        let grid = parse_sedgrid_content(&content, "small", Path::new(".")).unwrap();
        assert_eq!(grid.lam, vec![1000.0, 2000.0]);
    }

    fn oversized_grid(naxes: usize) -> String {
        let values: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
        let mut content = String::from("%BLOCK AXES\n");
        for i in 0..naxes {
            content.push_str(&format!("x{} {}\n", i, values.join(" ")));
        }
        content.push_str("%ENDBLOCK AXES\n");
        content.push_str("%BLOCK WAVELENGTH\n1000 2000\n%ENDBLOCK WAVELENGTH\n");
        content.push_str("%BLOCK SPECTRA\n%ENDBLOCK SPECTRA\n");
        content
    }

    #[test]
    fn test_parse_oversized_axes() {
        // 乘积溢出 usize
        match parse_sedgrid_content(&oversized_grid(7), "huge", Path::new(".")) {
            Err(SedGridError::ParseError { reason, .. }) => assert!(reason.contains("too large")),
            other => panic!("expected ParseError, got {:?}", other.map(|g| g.shape())),
        }

        // 不溢出但行数远少于网格点
        match parse_sedgrid_content(&oversized_grid(4), "huge", Path::new(".")) {
            Err(SedGridError::ParseError { reason, .. }) => assert!(reason.contains("missing")),
            other => panic!("expected ParseError, got {:?}", other.map(|g| g.shape())),
        }
    }

    #[test]
    fn test_parse_unterminated_block() {
        let content = "%BLOCK AXES\nlog10age 6.0\n";
        assert!(parse_sedgrid_content(content, "x", Path::new(".")).is_err());

        let content = "%BLOCK AXES\nlog10age 6.0\n%ENDBLOCK WAVELENGTH\n";
        assert!(parse_sedgrid_content(content, "x", Path::new(".")).is_err());
    }

    #[test]
    fn test_sedgrid_round_trip() {
        let grid = parse_sedgrid_content(SMALL, "small", Path::new(".")).unwrap();
        let text = to_sedgrid_string(&grid);
        let parsed = parse_sedgrid_content(&text, "small", Path::new(".")).unwrap();

        assert_eq!(parsed.axes, grid.axes);
        assert_eq!(parsed.lam, grid.lam);
        for name in grid.spectra_names() {
            assert_eq!(
                parsed.spectra_block(name).unwrap(),
                grid.spectra_block(name).unwrap()
            );
        }
    }

    #[test]
    fn test_unravel_index() {
        assert_eq!(unravel_index(0, &[2, 3]), vec![0, 0]);
        assert_eq!(unravel_index(4, &[2, 3]), vec![1, 1]);
        assert_eq!(unravel_index(5, &[2, 3]), vec![1, 2]);
    }
}
