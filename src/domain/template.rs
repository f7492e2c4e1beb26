// ==========================================
// 储备分配系统 - 历史模板领域模型
// ==========================================
// 职责: 历史供应商托盘拆分（按需求键）、物流肩距、名称/托盘重量兜底目录
// 生命周期: 单次运行独占；AllocationBuilder 仅回填 base_demand
// ==========================================

use crate::domain::types::{DemandKey, ProductId, RcId, SupplierId, SupplierSplit};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// TemplateEntry - 模板条目
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub pallets_by_supplier: SupplierSplit, // 历史拆分
    pub total_pallets: i64,                 // 拆分合计
    pub base_demand: i64,                   // 历史需求（取整），由 Builder 回填
}

impl TemplateEntry {
    /// 累加一条历史记录
    pub fn add(&mut self, supplier: SupplierId, pallets: i64) {
        self.pallets_by_supplier.add(supplier, pallets);
        self.total_pallets += pallets;
    }
}

// ==========================================
// TemplateData - 历史模板
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateData {
    pub entries: BTreeMap<DemandKey, TemplateEntry>,
    pub shoulder: HashMap<(SupplierId, RcId), i64>,
    pub supplier_name: HashMap<SupplierId, String>,
    pub product_name: HashMap<ProductId, String>,
    pub rc_name: HashMap<RcId, String>,
    pub pallet_weight: HashMap<ProductId, f64>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_mut(&mut self, key: DemandKey) -> &mut TemplateEntry {
        self.entries.entry(key).or_default()
    }

    /// 登记物流肩距（首条有效记录为准）
    pub fn record_shoulder(&mut self, supplier: SupplierId, rc: RcId, shoulder: i64) {
        if supplier != 0 && rc != 0 && shoulder != 0 {
            self.shoulder.entry((supplier, rc)).or_insert(shoulder);
        }
    }

    pub fn shoulder_of(&self, supplier: SupplierId, rc: RcId) -> Option<i64> {
        self.shoulder.get(&(supplier, rc)).copied()
    }

    /// 非零托盘重量
    pub fn pallet_weight_of(&self, product: ProductId) -> Option<f64> {
        self.pallet_weight
            .get(&product)
            .copied()
            .filter(|w| *w != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_entry_accumulates_per_supplier() {
        let mut data = TemplateData::new();
        let key = DemandKey::new(1, 2, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        data.entry_mut(key).add(10, 3);
        data.entry_mut(key).add(20, 4);
        data.entry_mut(key).add(10, 1);

        let entry = &data.entries[&key];
        assert_eq!(entry.total_pallets, 8);
        assert_eq!(entry.pallets_by_supplier.get(10), Some(4));
        assert_eq!(entry.base_demand, 0);
    }

    #[test]
    fn test_first_shoulder_wins() {
        let mut data = TemplateData::new();
        data.record_shoulder(10, 1, 3);
        data.record_shoulder(10, 1, 5);
        data.record_shoulder(10, 2, 0);

        assert_eq!(data.shoulder_of(10, 1), Some(3));
        assert_eq!(data.shoulder_of(10, 2), None);
    }
}
