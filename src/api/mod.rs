// ==========================================
// 储备分配系统 - API 层
// ==========================================
// 职责: 提供文件级运行接口，供命令行与批量任务调用
// ==========================================

pub mod error;
pub mod plan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use plan_api::{default_output_path, load_manifest, PlanApi, PlanRequest, PlanRunReport};
