use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Catalog, ComponentId},
    constants::{DEFAULT_ROOT, DEFAULT_STEP_BUDGET},
    error::{PlaceError, Result},
    placer::SolveOptions,
    render::RenderOptions,
};

/// メイン設定構造体
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub solver: SolverConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolverConfig {
    #[serde(default = "default_root")]
    pub root: String,
    /// TOML catalog; the built-in one is used when absent
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// 0 = unlimited
    #[serde(default = "default_step_budget")]
    pub step_budget: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_scale_px")]
    pub scale_px: f32,
    #[serde(default = "default_margin_px")]
    pub margin_px: f32,
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_step_budget() -> u64 {
    DEFAULT_STEP_BUDGET
}

fn default_output_dir() -> String {
    "out".to_string()
}

fn default_scale_px() -> f32 {
    RenderOptions::default().scale_px
}

fn default_margin_px() -> f32 {
    RenderOptions::default().margin_px
}

fn default_show_labels() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            catalog: None,
            step_budget: default_step_budget(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale_px: default_scale_px(),
            margin_px: default_margin_px(),
            show_labels: default_show_labels(),
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlaceError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            PlaceError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<()> {
        if self.solver.root.trim().is_empty() {
            return Err(PlaceError::Config("solver.root must not be empty".to_string()));
        }

        if self.solver.output_dir.trim().is_empty() {
            return Err(PlaceError::Config(
                "solver.output_dir must not be empty".to_string(),
            ));
        }

        if !self.render.scale_px.is_finite() || self.render.scale_px <= 0.0 {
            return Err(PlaceError::Config(format!(
                "render.scale_px must be positive, got {}",
                self.render.scale_px
            )));
        }

        if !self.render.margin_px.is_finite() || self.render.margin_px < 0.0 {
            return Err(PlaceError::Config(format!(
                "render.margin_px must not be negative, got {}",
                self.render.margin_px
            )));
        }

        Ok(())
    }

    pub fn root(&self) -> ComponentId {
        ComponentId::new(self.solver.root.trim())
    }

    /// Validated catalog from `solver.catalog`, or the built-in one
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.solver.catalog {
            Some(path) => Catalog::load_from_file(path),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn to_solve_options(&self) -> SolveOptions {
        SolveOptions {
            step_budget: match self.solver.step_budget {
                0 => None,
                n => Some(n),
            },
        }
    }

    pub fn to_render_options(&self) -> RenderOptions {
        RenderOptions {
            scale_px: self.render.scale_px,
            margin_px: self.render.margin_px,
            show_labels: self.render.show_labels,
        }
    }
}
