// ==========================================
// 储备分配系统 - 配置层
// ==========================================
// 职责: 运行配置加载与多级覆写
// 层级: 内置默认值 → JSON 配置文件 → 环境变量 → 命令行开关
// ==========================================

pub mod config_manager;
pub mod error;
pub mod run_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use run_config::{RunConfig, DEFAULT_TRUCK_PALLETS};
