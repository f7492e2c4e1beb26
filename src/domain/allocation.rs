// ==========================================
// 储备分配系统 - 分配与装车领域模型
// ==========================================
// AllocationItem: 一个 (需求键, 供应商) 的托盘分配，Builder 产出、Packer 只读
// OutputRow: 分配项在某一车次中的切片，终态实体
// ==========================================

use crate::domain::types::{DemandKey, ProductId, RcId, SupplierId, TruckId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// AllocationItem - 分配项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationItem {
    pub rc: RcId,
    pub rc_name: String,
    pub product: ProductId,
    pub product_name: String,
    pub date: NaiveDate,
    pub supplier: SupplierId,
    pub supplier_name: String,
    pub pallet_weight: f64,
    pub pallets: i64, // 正整数
}

impl AllocationItem {
    pub fn key(&self) -> DemandKey {
        DemandKey::new(self.rc, self.product, self.date)
    }
}

// ==========================================
// OutputRow - 装车输出行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub date: NaiveDate,
    pub supplier: SupplierId,
    pub supplier_name: String,
    pub product: ProductId,
    pub product_name: String,
    pub rc: RcId,
    pub rc_name: String,
    pub volume: f64,       // = pallets × pallet_weight
    pub truck_id: TruckId, // 全局唯一
    pub shoulder: i64,     // 物流肩距（透传）
    pub pallet_weight: f64,
    pub pallets: i64, // 本切片托盘数
}
