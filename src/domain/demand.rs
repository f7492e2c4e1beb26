// ==========================================
// 储备分配系统 - 需求领域模型
// ==========================================
// 职责: 已解码的需求行（一个配送中心 × 商品 × 交货日期 × 数量）
// 说明: 同一 DemandKey 可能出现多行，聚合由 AllocationBuilder 负责
// ==========================================

use crate::domain::types::{DemandKey, ProductId, RcId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DemandRecord - 需求记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub rc: RcId,             // 配送中心代码
    pub rc_name: String,      // 配送中心名称
    pub product: ProductId,   // 商品代码 (PLU)
    pub product_name: String, // 商品名称
    pub date: NaiveDate,      // 交货日期
    pub quantity: f64,        // 需求数量（非负）
}

impl DemandRecord {
    pub fn key(&self) -> DemandKey {
        DemandKey::new(self.rc, self.product, self.date)
    }
}
