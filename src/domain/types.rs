// ==========================================
// 储备分配系统 - 领域类型定义
// ==========================================
// 职责: 标识类型、需求键、供应商拆分
// 红线: 所有映射必须确定性迭代（不依赖哈希顺序）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 标识类型
// ==========================================
// 说明: 0 表示"缺失"（解码器将非法值统一强制为 0）
pub type RcId = i64; // 配送中心 (РЦ)
pub type ProductId = i64; // 商品 (PLU)
pub type SupplierId = i64; // 供应商 (SAP)
pub type TruckId = u64; // 车次（全局递增，从 1 开始）

/// 默认物流肩距（无模板信息时）
pub const DEFAULT_SHOULDER: i64 = 1;

/// 默认托盘承重（产品无托盘重量时）
pub const DEFAULT_PALLET_WEIGHT: f64 = 1.0;

// ==========================================
// DemandKey - 需求键
// ==========================================
// 派生 Ord 的字段顺序: rc → product → date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DemandKey {
    pub rc: RcId,
    pub product: ProductId,
    pub date: NaiveDate,
}

impl DemandKey {
    pub fn new(rc: RcId, product: ProductId, date: NaiveDate) -> Self {
        Self { rc, product, date }
    }
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rc={} plu={} date={}", self.rc, self.product, self.date)
    }
}

// ==========================================
// SupplierSplit - 供应商托盘拆分
// ==========================================
// 插入顺序即模板缩放的并列裁决顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSplit {
    entries: Vec<(SupplierId, i64)>,
}

impl SupplierSplit {
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅含一个供应商的拆分
    pub fn single(supplier: SupplierId, pallets: i64) -> Self {
        Self {
            entries: vec![(supplier, pallets)],
        }
    }

    /// 累加托盘数（供应商已存在时原位累加，保持首次出现顺序）
    pub fn add(&mut self, supplier: SupplierId, pallets: i64) {
        match self.entries.iter_mut().find(|(s, _)| *s == supplier) {
            Some((_, p)) => *p += pallets,
            None => self.entries.push((supplier, pallets)),
        }
    }

    pub fn get(&self, supplier: SupplierId) -> Option<i64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == supplier)
            .map(|(_, p)| *p)
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SupplierId, i64)> + '_ {
        self.entries.iter().copied()
    }
}

impl FromIterator<(SupplierId, i64)> for SupplierSplit {
    fn from_iter<I: IntoIterator<Item = (SupplierId, i64)>>(iter: I) -> Self {
        let mut split = SupplierSplit::new();
        for (supplier, pallets) in iter {
            split.add(supplier, pallets);
        }
        split
    }
}
