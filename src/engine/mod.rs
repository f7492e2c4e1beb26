// ==========================================
// 储备分配系统 - 引擎层
// ==========================================
// 职责: 实现分配与装车规则，不做文件读写
// 流程: AllocationBuilder (内含 TemplateScaler) → TruckPacker
// ==========================================

pub mod allocation_builder;
pub mod events;
pub mod orchestrator;
pub mod template_scaler;
pub mod truck_packer;

// 重导出核心引擎
pub use allocation_builder::{AggregatedDemand, AllocationBuilder, DemandAggregate};
pub use events::{
    CollectingEventSink, NoOpEventSink, PlanEvent, PlanEventSink, TracingEventSink,
};
pub use orchestrator::{run, PlanOrchestrator, PlanResult};
pub use template_scaler::{round_div, round_quantity, TemplateScaler};
pub use truck_packer::TruckPacker;
