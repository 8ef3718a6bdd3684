//! # check 子命令实现
//!
//! 并行加载目录中的全部网格文件，报告能否通过校验。
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs` 定义的 CheckArgs
//! - 使用 `batch/` 模块收集与并行处理
//! - 使用 `parsers/sedgrid.rs` 直接解析收集到的文件

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::check::CheckArgs;
use crate::error::{Result, SedGridError};
use crate::parsers::sedgrid::parse_sedgrid_file;
use crate::utils::output;

use std::path::PathBuf;

/// 执行 check
pub fn execute(args: CheckArgs) -> Result<()> {
    output::print_header("SED Grid Check");

    if !args.input.exists() {
        return Err(SedGridError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        return Err(SedGridError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    output::print_info(&format!("Found {} grid files", files.len()));

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Using {} parallel jobs", runner.jobs()));
    let result = runner.run(files, check_grid_file)?;

    for msg in &result.messages {
        output::print_success(msg);
    }

    output::print_separator();
    output::print_done(&format!(
        "Check complete: {} ok, {} failed",
        result.success, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed grids:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
        return Err(SedGridError::Other(format!(
            "{} of {} grid files failed validation",
            result.failed,
            result.total()
        )));
    }

    Ok(())
}

/// 解析单个网格文件并生成摘要（文件名可为任意扩展名）
fn check_grid_file(path: &PathBuf) -> ProcessResult {
    let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
        return ProcessResult::Failed(path.display().to_string(), "invalid file name".to_string());
    };

    match parse_sedgrid_file(path, name) {
        Ok(grid) => ProcessResult::Success(format!(
            "{}: axes [{}], {} wavelengths, spectra [{}]",
            path.display(),
            grid.axes
                .iter()
                .map(|a| format!("{}={}", a.name, a.len()))
                .collect::<Vec<_>>()
                .join(", "),
            grid.nlam(),
            grid.spectra_names().join(", ")
        )),
        Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::tests::test_grid_dir;

    #[test]
    fn test_check_grid_file() {
        let ok = check_grid_file(&test_grid_dir().join("test_grid.sedgrid"));
        assert!(matches!(ok, ProcessResult::Success(_)));

        let missing = check_grid_file(&test_grid_dir().join("missing.sedgrid"));
        assert!(matches!(missing, ProcessResult::Failed(_, _)));
    }

    #[test]
    fn test_check_grid_file_other_extension() {
        let content = std::fs::read_to_string(test_grid_dir().join("test_grid.sedgrid")).unwrap();
        let path = std::env::temp_dir().join(format!("sedgrid_{}_copy.grid", std::process::id()));
        std::fs::write(&path, content).unwrap();

        let result = check_grid_file(&path);
        std::fs::remove_file(&path).ok();

        match result {
            ProcessResult::Success(msg) => assert!(msg.contains("log10age=8")),
            ProcessResult::Failed(_, err) => panic!("check failed: {}", err),
        }
    }
}
