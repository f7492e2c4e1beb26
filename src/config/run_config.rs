// ==========================================
// 储备分配系统 - 运行配置
// ==========================================
// 职责: 单次运行的开关集合（运行期间不可变）
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认整车托盘数（供应商无已知上限时）
pub const DEFAULT_TRUCK_PALLETS: i64 = 32;

/// 运行配置
///
/// 所有字段带默认值，JSON 配置文件可只写需要覆盖的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 启用全部模板驱动逻辑；关闭时每个需求键都走储备兜底路径
    pub use_template: bool,

    /// 有历史需求时按当前需求等比缩放历史拆分
    pub scale_template: bool,

    /// 模板中无当前需求的键仍产出分配项
    pub include_template_without_demand: bool,

    /// 历史需求取整为 0 时是否仍透传历史拆分
    pub use_template_when_no_demand: bool,

    /// 预留：储备上限校验开关
    ///
    /// 当前版本不读取储备量作为上限，此开关仅加载和记录日志，不产生任何效果
    pub ignore_reserve_limits: bool,

    /// 兜底整车托盘数（正整数）
    pub default_truck_pallets: i64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            use_template: true,
            scale_template: true,
            include_template_without_demand: true,
            use_template_when_no_demand: true,
            ignore_reserve_limits: true,
            default_truck_pallets: DEFAULT_TRUCK_PALLETS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert!(config.use_template);
        assert!(config.scale_template);
        assert!(config.include_template_without_demand);
        assert!(config.use_template_when_no_demand);
        assert!(config.ignore_reserve_limits);
        assert_eq!(config.default_truck_pallets, 32);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"scale_template": false, "default_truck_pallets": 20}"#)
                .unwrap();
        assert!(!config.scale_template);
        assert_eq!(config.default_truck_pallets, 20);
        assert!(config.use_template);
    }
}
