use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{ConfigError, VertexId};
use crate::engine::GraphFormat;
use crate::sssp::{OutputFormat, RunOptions, DEFAULT_MAX_PASSES};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// 图数据来源
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GraphConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub format: GraphFormat,
    /// 顶点数下限，用于末尾没有边的孤立顶点
    pub vertices: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub source: VertexId,
    pub max_passes: u32,
    pub selective_scheduling: bool,
    pub threads: usize,
    pub trace: bool,
    pub verify: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: 0,
            max_passes: DEFAULT_MAX_PASSES,
            selective_scheduling: true,
            threads: num_cpus::get(),
            trace: false,
            verify: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// 结果文件，未设置时输出到标准输出
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
    /// 额外报告距离最远的顶点数
    pub top: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// 日志目录，未设置时输出到标准错误
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            file: "hopgraph".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    /// 加载配置文件，相对的图文件路径按配置文件所在目录解析
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.graph.file = config
                .graph
                .file
                .take()
                .map(|file| Config::resolve_path(base, file));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.max_passes == 0 {
            return Err(ConfigError::invalid("run.max_passes", "必须大于0"));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::invalid("log.level", "不能为空"));
        }
        if self.log.max_files == 0 {
            return Err(ConfigError::invalid("log.max_files", "必须大于0"));
        }
        Ok(())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            source: self.run.source,
            max_passes: self.run.max_passes,
            selective_scheduling: self.run.selective_scheduling,
            threads: self.run.threads,
            trace: self.run.trace,
        }
    }

    fn resolve_path(base: &Path, file: PathBuf) -> PathBuf {
        if file.is_absolute() || base.as_os_str().is_empty() {
            file
        } else {
            base.join(file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.run.source, 0);
        assert_eq!(config.run.max_passes, DEFAULT_MAX_PASSES);
        assert!(config.run.selective_scheduling);
        assert_eq!(config.log.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_save() {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let path = dir.path().join("hopgraph.toml");

        let mut config = Config::default();
        config.run.source = 3;
        config.output.format = OutputFormat::Json;
        config.save(&path).expect("Failed to save config");

        let loaded = Config::load(&path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[graph]\nfile = \"graph.txt\"\nformat = \"adjlist\"\n\n[run]\nmax_passes = 12\n")
            .expect("Failed to write TOML content to temporary file");

        let config = Config::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(config.graph.format, GraphFormat::AdjList);
        assert_eq!(config.run.max_passes, 12);
        assert!(config.run.selective_scheduling);

        let file = config.graph.file.expect("graph file should be set");
        assert!(file.is_absolute());
        assert!(file.ends_with("graph.txt"));
    }

    #[test]
    fn test_invalid_max_passes() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[run]\nmax_passes = 0\n")
            .expect("Failed to write TOML content to temporary file");

        let err = Config::load(temp_file.path()).expect_err("zero passes should be rejected");
        assert!(matches!(err, ConfigError::Invalid { key: "run.max_passes", .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[run\nsource = 1\n")
            .expect("Failed to write TOML content to temporary file");

        let err = Config::load(temp_file.path()).expect_err("malformed TOML should fail");
        assert!(matches!(err, ConfigError::Deserialize(_)));
    }

    #[test]
    fn test_run_options() {
        let mut config = Config::default();
        config.run.source = 7;
        config.run.selective_scheduling = false;
        let options = config.run_options();
        assert_eq!(options.source, 7);
        assert!(!options.selective_scheduling);
    }
}
