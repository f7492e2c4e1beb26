// ==========================================
// 储备分配系统 - 运行编排器
// ==========================================
// 用途: 串联 分配构建 → 装车 两个阶段
// 说明: 编排器只持有输入的所有权，不做文件读写
// ==========================================

use crate::config::RunConfig;
use crate::domain::allocation::{AllocationItem, OutputRow};
use crate::domain::catalog::CatalogInfo;
use crate::domain::demand::DemandRecord;
use crate::domain::template::TemplateData;
use crate::domain::types::TruckId;
use crate::engine::events::PlanEventSink;
use crate::engine::{AllocationBuilder, TruckPacker};
use crate::perf::PerfGuard;
use tracing::{info, warn};

// ==========================================
// PlanResult - 运行结果
// ==========================================

#[derive(Debug, Clone, Default)]
pub struct PlanResult {
    /// 分配阶段输出（装车前）
    pub allocation_items: Vec<AllocationItem>,
    /// 装车后输出行（处理顺序，未排序）
    pub rows: Vec<OutputRow>,
    /// 使用的车次数（最大车次号）
    pub trucks: TruckId,
}

// ==========================================
// PlanOrchestrator - 运行编排器
// ==========================================

#[derive(Debug, Clone, Default)]
pub struct PlanOrchestrator {
    builder: AllocationBuilder,
    packer: TruckPacker,
}

impl PlanOrchestrator {
    pub fn new() -> Self {
        Self {
            builder: AllocationBuilder::new(),
            packer: TruckPacker::new(),
        }
    }

    /// 执行完整流程
    ///
    /// # 参数
    /// - demand: 需求记录
    /// - catalog: 储备目录（流程中会回填名称）
    /// - template: 历史模板（流程中会回填 base_demand）
    /// - config: 运行配置
    /// - sink: 进度事件接收者
    pub fn run(
        &self,
        demand: &[DemandRecord],
        mut catalog: CatalogInfo,
        mut template: Option<TemplateData>,
        config: &RunConfig,
        sink: &dyn PlanEventSink,
    ) -> PlanResult {
        let _perf = PerfGuard::new("plan_run");

        info!(
            demand_records = demand.len(),
            has_template = template.is_some(),
            use_template = config.use_template,
            scale_template = config.scale_template,
            "开始执行分配流程"
        );
        // 储备数量仅决定兜底供应商，任何取值下都不约束分配量
        info!(
            ignore_reserve_limits = config.ignore_reserve_limits,
            "储备数量不参与分配约束（ignore_reserve_limits 无论取值均不生效）"
        );

        let allocation_items = {
            let _perf = PerfGuard::new("build_allocations");
            self.builder
                .build(demand, &mut catalog, template.as_mut(), config, sink)
        };
        if allocation_items.is_empty() && !demand.is_empty() {
            warn!("存在需求但未生成任何分配项，请检查储备表中的供应商");
        }

        let rows = {
            let _perf = PerfGuard::new("pack_trucks");
            self.packer
                .pack(&allocation_items, &catalog, template.as_ref(), config, sink)
        };
        let trucks = rows.iter().map(|r| r.truck_id).max().unwrap_or(0);

        info!(
            allocation_items = allocation_items.len(),
            rows = rows.len(),
            trucks,
            "分配流程完成"
        );

        PlanResult {
            allocation_items,
            rows,
            trucks,
        }
    }
}

/// 便捷入口: 需求 + 目录 + 模板 + 配置 → 输出行
pub fn run(
    demand: &[DemandRecord],
    catalog: CatalogInfo,
    template: Option<TemplateData>,
    config: &RunConfig,
    sink: &dyn PlanEventSink,
) -> Vec<OutputRow> {
    PlanOrchestrator::new()
        .run(demand, catalog, template, config, sink)
        .rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::{CollectingEventSink, NoOpEventSink, PlanEvent};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn record(rc: i64, product: i64, quantity: f64) -> DemandRecord {
        DemandRecord {
            rc,
            rc_name: format!("РЦ {}", rc),
            product,
            product_name: format!("PLU {}", product),
            date: date(),
            quantity,
        }
    }

    fn catalog() -> CatalogInfo {
        let mut catalog = CatalogInfo::new();
        catalog.add_reserve(1, 100, 50.0);
        catalog.supplier_name.insert(1, "Поставщик 1".to_string());
        catalog.pallet_weight.insert(100, 10.0);
        catalog.max_pallets.insert(1, 3);
        catalog
    }

    #[test]
    fn test_run_without_template() {
        // 45 / 10 → ceil = 5 托盘，整车 3 → 两车
        let rows = run(
            &[record(10, 100, 45.0)],
            catalog(),
            None,
            &RunConfig::default(),
            &NoOpEventSink,
        );

        let slices: Vec<_> = rows.iter().map(|r| (r.truck_id, r.pallets)).collect();
        assert_eq!(slices, vec![(1, 3), (2, 2)]);
        assert_eq!(rows[0].supplier_name, "Поставщик 1");
        assert_eq!(rows[0].rc_name, "РЦ 10");
        assert_eq!(rows[0].volume, 30.0);
    }

    #[test]
    fn test_run_reports_progress_events() {
        let sink = CollectingEventSink::new();
        let result = PlanOrchestrator::new().run(
            &[record(10, 100, 45.0)],
            catalog(),
            None,
            &RunConfig::default(),
            &sink,
        );

        assert_eq!(result.trucks, 2);
        assert_eq!(result.allocation_items.len(), 1);

        let events = sink.events();
        assert!(events.contains(&PlanEvent::AllocationsBuilt { items: 1 }));
        assert!(events.contains(&PlanEvent::TrucksPacked { rows: 2, trucks: 2 }));
    }

    #[test]
    fn test_run_empty_demand() {
        let result = PlanOrchestrator::new().run(
            &[],
            catalog(),
            None,
            &RunConfig::default(),
            &NoOpEventSink,
        );
        assert!(result.rows.is_empty());
        assert_eq!(result.trucks, 0);
    }
}
