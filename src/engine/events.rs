// ==========================================
// 储备分配系统 - 引擎层进度事件
// ==========================================
// 职责: 定义进度事件接收 trait（由调用方注入）
// 说明: 引擎只调用 sink，计算结果不依赖 sink 的任何行为
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

// ==========================================
// 进度事件
// ==========================================

/// 运行进度事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanEvent {
    /// 表格解码完成
    TableLoaded { table: String, records: usize },
    /// 需求聚合完成
    DemandAggregated { records: usize, keys: usize },
    /// 分配项生成完成
    AllocationsBuilt { items: usize },
    /// 装车完成
    TrucksPacked { rows: usize, trucks: u64 },
    /// 输出写出完成
    OutputWritten { path: String, rows: usize },
}

impl PlanEvent {
    /// 日志文案
    pub fn message(&self) -> String {
        match self {
            PlanEvent::TableLoaded { table, records } => {
                format!("{}: 记录 {}", table, records)
            }
            PlanEvent::DemandAggregated { records, keys } => {
                format!("需求聚合: 行 {} → 键 {}", records, keys)
            }
            PlanEvent::AllocationsBuilt { items } => format!("分配项: {}", items),
            PlanEvent::TrucksPacked { rows, trucks } => {
                format!("输出行: {}, 车次: {}", rows, trucks)
            }
            PlanEvent::OutputWritten { path, rows } => {
                format!("已保存: {} ({} 行)", path, rows)
            }
        }
    }
}

// ==========================================
// 事件接收 Trait
// ==========================================

/// 进度事件接收者
pub trait PlanEventSink: Send + Sync {
    fn emit(&self, event: &PlanEvent);
}

/// 空操作接收者
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl PlanEventSink for NoOpEventSink {
    fn emit(&self, _event: &PlanEvent) {}
}

/// 写入 tracing 日志的接收者
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl PlanEventSink for TracingEventSink {
    fn emit(&self, event: &PlanEvent) {
        tracing::info!(target: "plan_progress", "{}", event.message());
    }
}

/// 收集事件的接收者（测试/汇总用）
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<PlanEvent>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlanEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PlanEventSink for CollectingEventSink {
    fn emit(&self, event: &PlanEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
