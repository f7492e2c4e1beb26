// ==========================================
// 储备分配系统 - 分配构建引擎
// ==========================================
// 职责: 需求聚合 + 供应商托盘拆分（模板缩放 / 储备兜底）
// 输入: 需求记录 + 储备目录 + 历史模板(可选) + 运行配置
// 输出: AllocationItem 列表（需求键 × 供应商 × 托盘数）
// 红线: 无供应商的需求键直接不产出分配项，不视为错误
// ==========================================

use crate::config::RunConfig;
use crate::domain::allocation::AllocationItem;
use crate::domain::catalog::CatalogInfo;
use crate::domain::demand::DemandRecord;
use crate::domain::template::TemplateData;
use crate::domain::types::{
    DemandKey, ProductId, SupplierId, SupplierSplit, DEFAULT_PALLET_WEIGHT,
};
use crate::engine::events::{PlanEvent, PlanEventSink};
use crate::engine::template_scaler::{round_quantity, TemplateScaler};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

// ==========================================
// DemandAggregate - 聚合需求
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct DemandAggregate {
    pub quantity: f64,
    pub rc_name: String,      // 该键首条非空名称
    pub product_name: String, // 该键首条非空名称
}

pub type AggregatedDemand = BTreeMap<DemandKey, DemandAggregate>;

// ==========================================
// AllocationBuilder - 分配构建引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AllocationBuilder {
    scaler: TemplateScaler,
}

impl AllocationBuilder {
    pub fn new() -> Self {
        Self {
            scaler: TemplateScaler::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 构建分配项
    ///
    /// # 参数
    /// - `records`: 需求记录
    /// - `catalog`: 储备目录（会回填配送中心/商品名称）
    /// - `template`: 历史模板（会回填 base_demand）
    /// - `config`: 运行配置
    /// - `sink`: 进度事件接收者
    ///
    /// # 返回
    /// 分配项列表，顺序: 需求键升序（每键内按拆分顺序），随后为无需求的模板键
    #[instrument(skip_all, fields(
        records = records.len(),
        has_template = template.is_some(),
        use_template = config.use_template
    ))]
    pub fn build(
        &self,
        records: &[DemandRecord],
        catalog: &mut CatalogInfo,
        template: Option<&mut TemplateData>,
        config: &RunConfig,
        sink: &dyn PlanEventSink,
    ) -> Vec<AllocationItem> {
        // 1. 需求聚合 + 名称回填
        let demand = self.aggregate_demand(records, catalog);
        sink.emit(&PlanEvent::DemandAggregated {
            records: records.len(),
            keys: demand.len(),
        });

        // 2. 回填模板 base_demand
        let template: Option<&TemplateData> = match template {
            Some(t) => {
                self.backfill_base_demand(&demand, t);
                Some(&*t)
            }
            None => None,
        };

        // 3. 逐需求键确定供应商拆分
        let mut items = Vec::new();
        let mut dropped_keys = 0usize;
        for (key, aggregate) in &demand {
            let pallet_weight = resolve_pallet_weight(key.product, catalog, template);
            let split = self.resolve_split(
                *key,
                aggregate.quantity,
                pallet_weight,
                catalog,
                template,
                config,
            );
            if split.is_empty() {
                dropped_keys += 1;
                debug!(
                    key = %key,
                    quantity = aggregate.quantity,
                    "需求键无可用供应商，跳过"
                );
                continue;
            }

            let rc_name = catalog
                .rc_name
                .get(&key.rc)
                .cloned()
                .unwrap_or_else(|| aggregate.rc_name.clone());
            let product_name = catalog
                .product_name
                .get(&key.product)
                .cloned()
                .unwrap_or_else(|| aggregate.product_name.clone());

            self.push_items(
                &mut items,
                *key,
                &split,
                &rc_name,
                &product_name,
                pallet_weight,
                catalog,
                template,
            );
        }

        // 4. 无需求的模板键
        let mut template_only_items = 0usize;
        if let Some(template) = template {
            if config.use_template && config.include_template_without_demand {
                let before = items.len();
                for (key, entry) in &template.entries {
                    if demand.contains_key(key) {
                        continue;
                    }
                    let pallet_weight =
                        resolve_pallet_weight(key.product, catalog, Some(template));
                    let rc_name = lookup_name(&catalog.rc_name, &template.rc_name, key.rc);
                    let product_name =
                        lookup_name(&catalog.product_name, &template.product_name, key.product);
                    self.push_items(
                        &mut items,
                        *key,
                        &entry.pallets_by_supplier,
                        &rc_name,
                        &product_name,
                        pallet_weight,
                        catalog,
                        Some(template),
                    );
                }
                template_only_items = items.len() - before;
            }
        }

        info!(
            demand_keys = demand.len(),
            dropped_keys,
            template_only_items,
            items = items.len(),
            "分配项构建完成"
        );
        sink.emit(&PlanEvent::AllocationsBuilt { items: items.len() });
        items
    }

    /// 需求聚合
    ///
    /// 按 (配送中心, 商品, 日期) 累加数量，同时把需求中的名称回填进目录（不覆盖已有名称）
    pub fn aggregate_demand(
        &self,
        records: &[DemandRecord],
        catalog: &mut CatalogInfo,
    ) -> AggregatedDemand {
        let mut demand: AggregatedDemand = BTreeMap::new();
        for record in records {
            let aggregate = demand.entry(record.key()).or_insert_with(|| DemandAggregate {
                quantity: 0.0,
                rc_name: String::new(),
                product_name: String::new(),
            });
            aggregate.quantity += record.quantity;
            if aggregate.rc_name.is_empty() {
                aggregate.rc_name = record.rc_name.clone();
            }
            if aggregate.product_name.is_empty() {
                aggregate.product_name = record.product_name.clone();
            }

            catalog.backfill_rc_name(record.rc, &record.rc_name);
            catalog.backfill_product_name(record.product, &record.product_name);
        }
        demand
    }

    /// 回填模板 base_demand = round(该键聚合需求)，无需求时为 0
    pub fn backfill_base_demand(&self, demand: &AggregatedDemand, template: &mut TemplateData) {
        for (key, entry) in template.entries.iter_mut() {
            entry.base_demand = demand
                .get(key)
                .map(|a| round_quantity(a.quantity))
                .unwrap_or(0);
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 单个需求键的供应商拆分
    fn resolve_split(
        &self,
        key: DemandKey,
        quantity: f64,
        pallet_weight: f64,
        catalog: &CatalogInfo,
        template: Option<&TemplateData>,
        config: &RunConfig,
    ) -> SupplierSplit {
        let entry = template
            .filter(|_| config.use_template)
            .and_then(|t| t.entries.get(&key));

        match entry {
            Some(entry) => {
                if config.scale_template && entry.base_demand > 0 {
                    self.scaler
                        .scale(&entry.pallets_by_supplier, entry.base_demand, quantity)
                } else if config.use_template_when_no_demand || !config.scale_template {
                    entry.pallets_by_supplier.clone()
                } else {
                    SupplierSplit::new()
                }
            }
            None => {
                let required_pallets = (quantity / pallet_weight).ceil() as i64;
                match catalog.first_supplier_for(key.product) {
                    Some(supplier) => SupplierSplit::single(supplier, required_pallets),
                    None => SupplierSplit::new(),
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_items(
        &self,
        items: &mut Vec<AllocationItem>,
        key: DemandKey,
        split: &SupplierSplit,
        rc_name: &str,
        product_name: &str,
        pallet_weight: f64,
        catalog: &CatalogInfo,
        template: Option<&TemplateData>,
    ) {
        for (supplier, pallets) in split.iter() {
            if pallets <= 0 {
                continue;
            }
            items.push(AllocationItem {
                rc: key.rc,
                rc_name: rc_name.to_string(),
                product: key.product,
                product_name: product_name.to_string(),
                date: key.date,
                supplier,
                supplier_name: resolve_supplier_name(supplier, catalog, template),
                pallet_weight,
                pallets,
            });
        }
    }
}

/// 托盘重量: 目录(非零) → 模板(非零) → 1.0
fn resolve_pallet_weight(
    product: ProductId,
    catalog: &CatalogInfo,
    template: Option<&TemplateData>,
) -> f64 {
    catalog
        .pallet_weight_of(product)
        .or_else(|| template.and_then(|t| t.pallet_weight_of(product)))
        .unwrap_or(DEFAULT_PALLET_WEIGHT)
}

/// 供应商名称: 目录 → 模板 → 空串
fn resolve_supplier_name(
    supplier: SupplierId,
    catalog: &CatalogInfo,
    template: Option<&TemplateData>,
) -> String {
    catalog
        .supplier_name
        .get(&supplier)
        .filter(|n| !n.is_empty())
        .or_else(|| template.and_then(|t| t.supplier_name.get(&supplier)))
        .cloned()
        .unwrap_or_default()
}

/// 名称: 目录 → 模板 → 空串
fn lookup_name(primary: &HashMap<i64, String>, fallback: &HashMap<i64, String>, id: i64) -> String {
    primary
        .get(&id)
        .or_else(|| fallback.get(&id))
        .cloned()
        .unwrap_or_default()
}
