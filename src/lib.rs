// ==========================================
// 储备分配系统 - 核心库
// ==========================================
// 流程: 需求表 + 储备表 (+ 历史模板) → 供应商托盘分配 → 整车装载 → 输出表
// 技术栈: Rust + calamine/csv 文件读写 + tracing
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 运行配置
pub mod config;

// 引擎层 - 分配与装车规则
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// API 层 - 文件级运行接口
pub mod api;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AllocationItem, CatalogInfo, DemandKey, DemandRecord, OutputRow, SupplierSplit, TemplateData,
    TemplateEntry,
};

// 配置
pub use config::{ConfigManager, RunConfig};

// 引擎
pub use engine::{
    run, AllocationBuilder, PlanEventSink, PlanOrchestrator, TemplateScaler, TruckPacker,
};

// API
pub use api::{PlanApi, PlanRequest, PlanRunReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "储备分配与装车排程系统";
