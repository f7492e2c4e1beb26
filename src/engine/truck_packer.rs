// ==========================================
// 储备分配系统 - 整车装载引擎
// ==========================================
// 职责: 按供应商把分配托盘依次装入容量受限的车次
// 输入: 分配项 + 储备目录(整车托盘上限) + 历史模板(物流肩距) + 运行配置
// 输出: OutputRow（车次 × 分配项切片）
// 红线: 顺序装载（next-fit），不做跨供应商合并，不做前瞻优化
// 红线: 车次号全局单调递增，从 1 开始，跨供应商不复用不重置
// ==========================================

use crate::config::RunConfig;
use crate::domain::allocation::{AllocationItem, OutputRow};
use crate::domain::catalog::CatalogInfo;
use crate::domain::template::TemplateData;
use crate::domain::types::{SupplierId, TruckId, DEFAULT_SHOULDER};
use crate::engine::events::{PlanEvent, PlanEventSink};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// TruckCounter - 全局车次号分配器
// ==========================================
#[derive(Debug, Clone, Default)]
struct TruckCounter {
    last: TruckId,
}

impl TruckCounter {
    fn next(&mut self) -> TruckId {
        self.last += 1;
        self.last
    }
}

// ==========================================
// OpenTruck - 当前装载中的车次
// ==========================================
#[derive(Debug, Clone, Copy)]
struct OpenTruck {
    truck_id: TruckId,
    remaining: i64,
}

// ==========================================
// TruckPacker - 整车装载引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TruckPacker;

impl TruckPacker {
    pub fn new() -> Self {
        Self
    }

    /// 装车
    ///
    /// 规则：
    /// 1) 分配项按供应商分组，供应商按代码升序处理
    /// 2) 组内按 (日期, 配送中心, 商品) 升序
    /// 3) 每个托盘切片写一行；当前车次装满后开新车次
    ///
    /// # 返回
    /// 输出行（按处理顺序），单个分配项可能跨多个车次
    #[instrument(skip_all, fields(items = items.len(), has_template = template.is_some()))]
    pub fn pack(
        &self,
        items: &[AllocationItem],
        catalog: &CatalogInfo,
        template: Option<&TemplateData>,
        config: &RunConfig,
        sink: &dyn PlanEventSink,
    ) -> Vec<OutputRow> {
        let mut grouped: BTreeMap<SupplierId, Vec<&AllocationItem>> = BTreeMap::new();
        for item in items {
            grouped.entry(item.supplier).or_default().push(item);
        }

        let mut counter = TruckCounter::default();
        let mut rows = Vec::new();

        for (supplier, mut supplier_items) in grouped {
            let capacity = self.truck_capacity(supplier, catalog, config);
            supplier_items.sort_by_key(|item| (item.date, item.rc, item.product));

            let first_truck = counter.last + 1;
            let mut current: Option<OpenTruck> = None;

            for item in supplier_items {
                let mut pallets_left = item.pallets;
                while pallets_left > 0 {
                    let truck = match current {
                        Some(truck) if truck.remaining > 0 => truck,
                        _ => OpenTruck {
                            truck_id: counter.next(),
                            remaining: capacity,
                        },
                    };

                    let take = truck.remaining.min(pallets_left);
                    pallets_left -= take;
                    current = Some(OpenTruck {
                        truck_id: truck.truck_id,
                        remaining: truck.remaining - take,
                    });

                    rows.push(OutputRow {
                        date: item.date,
                        supplier,
                        supplier_name: item.supplier_name.clone(),
                        product: item.product,
                        product_name: item.product_name.clone(),
                        rc: item.rc,
                        rc_name: item.rc_name.clone(),
                        volume: take as f64 * item.pallet_weight,
                        truck_id: truck.truck_id,
                        shoulder: shoulder_for(supplier, item.rc, template),
                        pallet_weight: item.pallet_weight,
                        pallets: take,
                    });
                }
            }

            debug!(
                supplier,
                capacity,
                trucks = counter.last + 1 - first_truck,
                "供应商装车完成"
            );
        }

        info!(rows = rows.len(), trucks = counter.last, "装车完成");
        sink.emit(&PlanEvent::TrucksPacked {
            rows: rows.len(),
            trucks: counter.last,
        });
        rows
    }

    /// 供应商整车托盘数: 目录上限(非零) → 配置兜底值（至少 1）
    pub fn truck_capacity(
        &self,
        supplier: SupplierId,
        catalog: &CatalogInfo,
        config: &RunConfig,
    ) -> i64 {
        catalog
            .max_pallets_of(supplier)
            .unwrap_or(config.default_truck_pallets)
            .max(1)
    }
}

/// 物流肩距: 有模板时取 (供应商, 配送中心) 映射，缺失或无模板时为默认值
fn shoulder_for(supplier: SupplierId, rc: i64, template: Option<&TemplateData>) -> i64 {
    template
        .and_then(|t| t.shoulder_of(supplier, rc))
        .unwrap_or(DEFAULT_SHOULDER)
}
