// ==========================================
// 储备分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验、快照
// 存储: JSON 配置文件（可选）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::run_config::RunConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    /// 配置文件路径
    pub const CONFIG_PATH: &str = "RESERVE_PLANNER_CONFIG";

    pub const USE_TEMPLATE: &str = "RESERVE_PLANNER_USE_TEMPLATE";
    pub const SCALE_TEMPLATE: &str = "RESERVE_PLANNER_SCALE_TEMPLATE";
    pub const INCLUDE_TEMPLATE_WITHOUT_DEMAND: &str =
        "RESERVE_PLANNER_INCLUDE_TEMPLATE_WITHOUT_DEMAND";
    pub const USE_TEMPLATE_WHEN_NO_DEMAND: &str = "RESERVE_PLANNER_USE_TEMPLATE_WHEN_NO_DEMAND";
    pub const IGNORE_RESERVE_LIMITS: &str = "RESERVE_PLANNER_IGNORE_RESERVE_LIMITS";
    pub const DEFAULT_TRUCK_PALLETS: &str = "RESERVE_PLANNER_DEFAULT_TRUCK_PALLETS";
}

/// 默认配置文件所在目录名（位于系统配置目录下）
const CONFIG_DIR_NAME: &str = "reserve-planner";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: RunConfig,
    source: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            config: RunConfig::default(),
            source: None,
        }
    }
}

impl ConfigManager {
    /// 按完整层级加载配置
    ///
    /// # 参数
    /// - explicit_path: 命令行指定的配置文件（优先于环境变量与默认位置）
    ///
    /// # 层级
    /// 1. 内置默认值
    /// 2. 配置文件（显式路径 → RESERVE_PLANNER_CONFIG → 系统配置目录，仅存在时读取）
    /// 3. 环境变量覆写
    pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        let path = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var(config_keys::CONFIG_PATH)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .or_else(|| default_config_path().filter(|p| p.exists())),
        };

        let mut manager = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        manager.apply_overrides(|key| std::env::var(key).ok())?;
        manager.validate()?;

        info!(
            source = %manager.source_label(),
            "运行配置已加载"
        );
        Ok(manager)
    }

    /// 从 JSON 文件读取配置（缺失字段取默认值）
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: RunConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        debug!(path = %path.display(), "配置文件读取完成");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 直接包装已有配置
    pub fn from_config(config: RunConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// 应用键值覆写
    ///
    /// # 参数
    /// - lookup: 键 → 值 的查询函数（生产环境为环境变量）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bool_keys: [(&str, &mut bool); 5] = [
            (config_keys::USE_TEMPLATE, &mut self.config.use_template),
            (config_keys::SCALE_TEMPLATE, &mut self.config.scale_template),
            (
                config_keys::INCLUDE_TEMPLATE_WITHOUT_DEMAND,
                &mut self.config.include_template_without_demand,
            ),
            (
                config_keys::USE_TEMPLATE_WHEN_NO_DEMAND,
                &mut self.config.use_template_when_no_demand,
            ),
            (
                config_keys::IGNORE_RESERVE_LIMITS,
                &mut self.config.ignore_reserve_limits,
            ),
        ];

        for (key, slot) in bool_keys {
            if let Some(raw) = lookup(key) {
                *slot = parse_bool(key, &raw)?;
                debug!(key, value = *slot, "配置覆写");
            }
        }

        if let Some(raw) = lookup(config_keys::DEFAULT_TRUCK_PALLETS) {
            self.config.default_truck_pallets =
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: config_keys::DEFAULT_TRUCK_PALLETS.to_string(),
                        value: raw.clone(),
                        message: "期望整数".to_string(),
                    })?;
            debug!(
                key = config_keys::DEFAULT_TRUCK_PALLETS,
                value = self.config.default_truck_pallets,
                "配置覆写"
            );
        }

        Ok(())
    }

    /// 校验配置取值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.config.default_truck_pallets < 1 {
            return Err(ConfigError::InvalidValue {
                key: "default_truck_pallets".to_string(),
                value: self.config.default_truck_pallets.to_string(),
                message: "整车托盘数必须为正整数".to_string(),
            });
        }
        Ok(())
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RunConfig {
        &mut self.config
    }

    pub fn into_config(self) -> RunConfig {
        self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 配置快照（JSON），写入运行日志以便复现
    pub fn snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.config)?)
    }

    fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string())
    }
}

/// 系统配置目录下的默认配置文件位置
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn parse_bool(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: "期望布尔值 (1/0, true/false, yes/no, on/off)".to_string(),
        }),
    }
}
