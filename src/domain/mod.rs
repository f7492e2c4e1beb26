// ==========================================
// 储备分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod catalog;
pub mod demand;
pub mod template;
pub mod types;

// 重导出核心类型
pub use allocation::{AllocationItem, OutputRow};
pub use catalog::CatalogInfo;
pub use demand::DemandRecord;
pub use template::{TemplateData, TemplateEntry};
pub use types::{
    DemandKey, ProductId, RcId, SupplierId, SupplierSplit, TruckId, DEFAULT_PALLET_WEIGHT,
    DEFAULT_SHOULDER,
};
