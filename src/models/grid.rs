//! # SED 网格数据模型
//!
//! 预计算的恒星族群光谱网格，按各轴整数下标（年龄 `ia`、金属丰度 `iZ` 等）索引。
//!
//! ## 存储布局
//! 每种光谱（如 `stellar`, `nebular`）以行主序展平存储，
//! 形状为 `axes[0] × axes[1] × ... × nlam`，波长为最内层维度。
//!
//! ## 依赖关系
//! - 被 `parsers/sedgrid.rs` 构造
//! - 被 `spectra/` 和 `commands/` 使用
//! - 使用 `models/sed.rs`

use crate::error::{Result, SedGridError};
use crate::models::Sed;
use crate::parsers::sedgrid;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 网格文件扩展名
pub const GRID_EXTENSION: &str = "sedgrid";

/// 默认光谱类型
pub const DEFAULT_SPECTRA: &str = "stellar";

/// 网格轴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    /// 轴名称（如 log10age, metallicity）
    pub name: String,
    /// 轴取值（严格递增）
    pub values: Vec<f64>,
}

impl GridAxis {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 最接近给定值的下标（等距时取较小下标）
    pub fn nearest_index(&self, value: f64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, v) in self.values.iter().enumerate() {
            let dist = (v - value).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }
}

/// SED 网格
#[derive(Debug, Clone)]
pub struct Grid {
    /// 网格名称
    pub name: String,
    /// 网格所在目录
    pub grid_dir: PathBuf,
    /// 网格轴
    pub axes: Vec<GridAxis>,
    /// 波长 (Å)
    pub lam: Vec<f64>,
    /// 各类光谱的展平数据
    spectra: BTreeMap<String, Vec<f64>>,
}

impl Grid {
    /// 从目录加载网格：`<grid_dir>/<name>.sedgrid`
    pub fn load(name: &str, grid_dir: &Path) -> Result<Grid> {
        if !grid_dir.is_dir() {
            return Err(SedGridError::DirectoryNotFound {
                path: grid_dir.display().to_string(),
            });
        }

        let path = Self::file_path(name, grid_dir);
        if !path.is_file() {
            return Err(SedGridError::GridNotFound {
                name: name.to_string(),
                dir: grid_dir.display().to_string(),
            });
        }

        sedgrid::parse_sedgrid_file(&path, name)
    }

    /// 网格文件路径
    pub fn file_path(name: &str, grid_dir: &Path) -> PathBuf {
        grid_dir.join(format!("{}.{}", name, GRID_EXTENSION))
    }

    /// 从各部分构造并校验网格
    pub fn from_parts(
        name: impl Into<String>,
        grid_dir: impl Into<PathBuf>,
        axes: Vec<GridAxis>,
        lam: Vec<f64>,
        spectra: BTreeMap<String, Vec<f64>>,
    ) -> Result<Grid> {
        if axes.is_empty() {
            return Err(SedGridError::InvalidGrid("grid has no axes".to_string()));
        }

        for axis in &axes {
            if axis.is_empty() {
                return Err(SedGridError::InvalidGrid(format!(
                    "axis '{}' has no values",
                    axis.name
                )));
            }
            if axis.values.iter().any(|v| !v.is_finite()) {
                return Err(SedGridError::InvalidGrid(format!(
                    "axis '{}' has non-finite values",
                    axis.name
                )));
            }
            if axis.values.windows(2).any(|w| w[1] <= w[0]) {
                return Err(SedGridError::InvalidGrid(format!(
                    "axis '{}' is not strictly increasing",
                    axis.name
                )));
            }
        }

        if lam.is_empty() {
            return Err(SedGridError::InvalidGrid(
                "wavelength axis is empty".to_string(),
            ));
        }
        let lam_invalid = lam.iter().any(|l| !l.is_finite() || *l <= 0.0);
        if lam_invalid || lam.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SedGridError::InvalidGrid(
                "wavelengths must be positive and strictly increasing".to_string(),
            ));
        }

        if spectra.is_empty() {
            return Err(SedGridError::InvalidGrid("grid has no spectra".to_string()));
        }

        let expected = checked_grid_size(&axes, lam.len()).ok_or_else(|| {
            SedGridError::InvalidGrid("grid size overflows the address space".to_string())
        })?;
        for (spec_name, data) in &spectra {
            if data.len() != expected {
                return Err(SedGridError::InvalidGrid(format!(
                    "spectra '{}' has {} values, expected {}",
                    spec_name,
                    data.len(),
                    expected
                )));
            }
            if data.iter().any(|v| !v.is_finite()) {
                return Err(SedGridError::InvalidGrid(format!(
                    "spectra '{}' contains non-finite values",
                    spec_name
                )));
            }
        }

        Ok(Grid {
            name: name.into(),
            grid_dir: grid_dir.into(),
            axes,
            lam,
            spectra,
        })
    }

    /// 各轴长度（不含波长）
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.len()).collect()
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn nlam(&self) -> usize {
        self.lam.len()
    }

    /// 网格点总数（不含波长）
    pub fn size(&self) -> usize {
        self.axes.iter().map(|a| a.len()).product()
    }

    /// 按名称查找轴（不区分大小写）
    pub fn axis(&self, name: &str) -> Option<(usize, &GridAxis)> {
        self.axes
            .iter()
            .enumerate()
            .find(|(_, a)| a.name.eq_ignore_ascii_case(name))
    }

    /// 可用的光谱类型
    pub fn spectra_names(&self) -> Vec<&str> {
        self.spectra.keys().map(|k| k.as_str()).collect()
    }

    /// 默认光谱：存在 `stellar` 时使用之，否则取第一个
    pub fn default_spectra(&self) -> &str {
        if self.spectra.contains_key(DEFAULT_SPECTRA) {
            DEFAULT_SPECTRA
        } else {
            self.spectra.keys().next().map(|k| k.as_str()).unwrap_or(DEFAULT_SPECTRA)
        }
    }

    /// 获取某类光谱的完整展平数据
    pub fn spectra_block(&self, spectra: &str) -> Result<&[f64]> {
        self.spectra
            .get(spectra)
            .map(|v| v.as_slice())
            .ok_or_else(|| SedGridError::UnknownSpectra {
                name: spectra.to_string(),
                available: self.spectra_names().join(", "),
            })
    }

    /// 获取 (ia, iZ) 处的默认光谱 SED
    pub fn get_sed(&self, ia: usize, iz: usize) -> Result<Sed> {
        if self.ndim() != 2 {
            return Err(SedGridError::DimensionMismatch {
                expected: "2 grid axes (age, metallicity)".to_string(),
                got: format!("{} axes", self.ndim()),
            });
        }
        self.get_sed_at(self.default_spectra(), &[ia, iz])
    }

    /// 获取任意维度网格点处的指定光谱 SED
    pub fn get_sed_at(&self, spectra: &str, indices: &[usize]) -> Result<Sed> {
        let block = self.spectra_block(spectra)?;
        let flat = self.flat_index(indices)?;

        let nlam = self.nlam();
        let start = flat * nlam;
        let lnu = block[start..start + nlam].to_vec();

        let point = self
            .axes
            .iter()
            .zip(indices)
            .map(|(axis, i)| format!("{}[{}]", axis.name, i))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Sed::new(self.lam.clone(), lnu)?
            .with_description(format!("{} {} ({})", self.name, spectra, point)))
    }

    /// 行主序展平下标（不含波长维）
    pub fn flat_index(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.ndim() {
            return Err(SedGridError::DimensionMismatch {
                expected: format!("{} indices", self.ndim()),
                got: format!("{} indices", indices.len()),
            });
        }

        let mut index = 0;
        for (axis, &i) in self.axes.iter().zip(indices) {
            if i >= axis.len() {
                return Err(SedGridError::IndexOutOfRange {
                    axis: axis.name.clone(),
                    index: i,
                    len: axis.len(),
                });
            }
            index = index * axis.len() + i;
        }

        Ok(index)
    }

    /// 某轴上最接近给定值的下标
    pub fn get_nearest_index(&self, axis: usize, value: f64) -> Result<usize> {
        let grid_axis = self.axes.get(axis).ok_or_else(|| SedGridError::DimensionMismatch {
            expected: format!("axis index < {}", self.ndim()),
            got: axis.to_string(),
        })?;
        Ok(grid_axis.nearest_index(value))
    }

    /// 各轴上最接近给定值的下标
    pub fn get_nearest(&self, values: &[f64]) -> Result<Vec<usize>> {
        if values.len() != self.ndim() {
            return Err(SedGridError::DimensionMismatch {
                expected: format!("{} values", self.ndim()),
                got: format!("{} values", values.len()),
            });
        }

        values
            .iter()
            .enumerate()
            .map(|(axis, &v)| self.get_nearest_index(axis, v))
            .collect()
    }

    /// 只保留一种光谱的新网格
    pub fn select_spectra(&self, spectra: &str) -> Result<Grid> {
        let block = self.spectra_block(spectra)?.to_vec();
        let mut selected = BTreeMap::new();
        selected.insert(spectra.to_string(), block);

        Ok(Grid {
            name: self.name.clone(),
            grid_dir: self.grid_dir.clone(),
            axes: self.axes.clone(),
            lam: self.lam.clone(),
            spectra: selected,
        })
    }
}

/// 网格数据总长度 Π len(axis) × nlam，溢出时返回 None
pub fn checked_grid_size(axes: &[GridAxis], nlam: usize) -> Option<usize> {
    axes.iter().try_fold(nlam, |acc, axis| acc.checked_mul(axis.len()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 测试网格所在目录
    pub fn test_grid_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/test_grid")
    }

    /// 2×3 的小网格，lnu = 100*ia + 10*iz + ilam
    pub fn small_grid() -> Grid {
        let axes = vec![
            GridAxis::new("log10age", vec![6.0, 7.0]),
            GridAxis::new("metallicity", vec![0.001, 0.01, 0.02]),
        ];
        let lam = vec![1000.0, 2000.0, 3000.0, 4000.0];
        let mut data = Vec::new();
        for ia in 0..2 {
            for iz in 0..3 {
                for ilam in 0..4 {
                    data.push((100 * ia + 10 * iz + ilam) as f64);
                }
            }
        }
        let mut spectra = BTreeMap::new();
        spectra.insert("stellar".to_string(), data);
        Grid::from_parts("small", ".", axes, lam, spectra).unwrap()
    }

    #[test]
    fn test_get_sed_layout() {
        let grid = small_grid();
        let sed = grid.get_sed(1, 2).unwrap();
        assert_eq!(sed.lnu(), &[120.0, 121.0, 122.0, 123.0]);
        assert_eq!(sed.lam(), grid.lam.as_slice());
    }

    #[test]
    fn test_get_sed_out_of_range() {
        let grid = small_grid();
        match grid.get_sed(2, 0) {
            Err(SedGridError::IndexOutOfRange { axis, index, len }) => {
                assert_eq!(axis, "log10age");
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
        assert!(grid.get_sed(0, 3).is_err());
        assert!(matches!(
            grid.get_sed_at("stellar", &[0]),
            Err(SedGridError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            grid.get_sed_at("nebular", &[0, 0]),
            Err(SedGridError::UnknownSpectra { .. })
        ));
    }

    #[test]
    fn test_get_sed_requires_two_axes() {
        let axes = vec![GridAxis::new("log10age", vec![6.0, 7.0])];
        let mut spectra = BTreeMap::new();
        spectra.insert("stellar".to_string(), vec![1.0, 2.0, 3.0, 4.0]);
        let grid = Grid::from_parts("one_d", ".", axes, vec![1000.0, 2000.0], spectra).unwrap();

        assert!(matches!(
            grid.get_sed(0, 0),
            Err(SedGridError::DimensionMismatch { .. })
        ));
        assert_eq!(grid.get_sed_at("stellar", &[1]).unwrap().lnu(), &[3.0, 4.0]);
    }

    #[test]
    fn test_checked_grid_size() {
        let axes = vec![
            GridAxis::new("a", vec![0.0; 3]),
            GridAxis::new("b", vec![0.0; 4]),
        ];
        assert_eq!(checked_grid_size(&axes, 5), Some(60));

        let huge: Vec<GridAxis> = (0..8)
            .map(|i| GridAxis::new(format!("x{}", i), vec![0.0; 1000]))
            .collect();
        assert_eq!(checked_grid_size(&huge, 10), None);
    }

    #[test]
    fn test_nearest_index() {
        let grid = small_grid();
        assert_eq!(grid.get_nearest(&[6.4, 0.018]).unwrap(), vec![0, 2]);
        assert_eq!(grid.get_nearest(&[100.0, -1.0]).unwrap(), vec![1, 0]);
        // 等距时取较小下标
        assert_eq!(grid.get_nearest_index(0, 6.5).unwrap(), 0);
        assert!(grid.get_nearest_index(5, 1.0).is_err());
    }

    #[test]
    fn test_from_parts_validation() {
        let lam = vec![1000.0, 2000.0];
        let mut spectra = BTreeMap::new();
        spectra.insert("stellar".to_string(), vec![1.0; 3]);
        let result = Grid::from_parts(
            "bad",
            ".",
            vec![GridAxis::new("log10age", vec![6.0, 7.0])],
            lam.clone(),
            spectra,
        );
        assert!(matches!(result, Err(SedGridError::InvalidGrid(_))));

        let mut spectra = BTreeMap::new();
        spectra.insert("stellar".to_string(), vec![1.0; 4]);
        let result = Grid::from_parts(
            "bad",
            ".",
            vec![GridAxis::new("log10age", vec![7.0, 6.0])],
            lam,
            spectra,
        );
        assert!(matches!(result, Err(SedGridError::InvalidGrid(_))));
    }

    #[test]
    fn test_load_test_grid_and_add() {
        let grid = Grid::load("test_grid", &test_grid_dir()).unwrap();
        assert_eq!(grid.shape(), vec![8, 6]);
        assert_eq!(grid.spectra_names(), vec!["nebular", "stellar"]);
        assert_eq!(grid.default_spectra(), "stellar");

        let sed1 = grid.get_sed(5, 5).unwrap();
        let sed2 = grid.get_sed(3, 5).unwrap();
        let sed = (&sed1 + &sed2).unwrap();

        assert_eq!(sed.len(), grid.nlam());
        for i in 0..sed.len() {
            assert_eq!(sed.lnu()[i], sed1.lnu()[i] + sed2.lnu()[i]);
        }
        assert!(sed.bolometric_luminosity() > sed1.bolometric_luminosity());
    }

    #[test]
    fn test_load_missing_grid() {
        assert!(matches!(
            Grid::load("no_such_grid", &test_grid_dir()),
            Err(SedGridError::GridNotFound { .. })
        ));
        assert!(matches!(
            Grid::load("test_grid", Path::new("/no/such/dir")),
            Err(SedGridError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_select_spectra() {
        let grid = Grid::load("test_grid", &test_grid_dir()).unwrap();
        let nebular = grid.select_spectra("nebular").unwrap();
        assert_eq!(nebular.spectra_names(), vec!["nebular"]);
        assert_eq!(nebular.default_spectra(), "nebular");
        assert!(nebular.get_sed(5, 5).is_ok());
    }
}
