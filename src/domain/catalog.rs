// ==========================================
// 储备分配系统 - 储备/目录领域模型
// ==========================================
// 职责: 供应商/商品/配送中心名称、托盘重量、整车托盘上限、储备量
// 生命周期: 单次运行独占；AllocationBuilder 会原位回填名称
// ==========================================

use crate::domain::types::{ProductId, RcId, SupplierId};
use std::collections::HashMap;

// ==========================================
// CatalogInfo - 储备目录
// ==========================================
// 不变量: reserve 中的键 (supplier, product) 均非零，且储备值非零
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogInfo {
    pub supplier_name: HashMap<SupplierId, String>,
    pub product_name: HashMap<ProductId, String>,
    pub rc_name: HashMap<RcId, String>,
    pub pallet_weight: HashMap<ProductId, f64>,
    pub max_pallets: HashMap<SupplierId, i64>,
    pub reserve: HashMap<(SupplierId, ProductId), f64>,
    /// 商品 → 持有储备的供应商（首次出现顺序，无重复）
    pub suppliers_by_product: HashMap<ProductId, Vec<SupplierId>>,
}

impl CatalogInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一条储备记录
    ///
    /// 供应商、商品或储备值任一为零时忽略（保持不变量）
    pub fn add_reserve(&mut self, supplier: SupplierId, product: ProductId, value: f64) {
        if supplier == 0 || product == 0 || value == 0.0 {
            return;
        }
        self.reserve.insert((supplier, product), value);
        let suppliers = self.suppliers_by_product.entry(product).or_default();
        if !suppliers.contains(&supplier) {
            suppliers.push(supplier);
        }
    }

    /// 兜底供应商：该商品首个持有储备的供应商
    pub fn first_supplier_for(&self, product: ProductId) -> Option<SupplierId> {
        self.suppliers_by_product
            .get(&product)
            .and_then(|list| list.first().copied())
    }

    /// 非零托盘重量
    pub fn pallet_weight_of(&self, product: ProductId) -> Option<f64> {
        self.pallet_weight
            .get(&product)
            .copied()
            .filter(|w| *w != 0.0)
    }

    /// 非零整车托盘上限
    pub fn max_pallets_of(&self, supplier: SupplierId) -> Option<i64> {
        self.max_pallets.get(&supplier).copied().filter(|c| *c > 0)
    }

    /// 回填配送中心名称（已有名称不覆盖）
    pub fn backfill_rc_name(&mut self, rc: RcId, name: &str) {
        if !name.is_empty() {
            self.rc_name.entry(rc).or_insert_with(|| name.to_string());
        }
    }

    /// 回填商品名称（已有名称不覆盖）
    pub fn backfill_product_name(&mut self, product: ProductId, name: &str) {
        if !name.is_empty() {
            self.product_name
                .entry(product)
                .or_insert_with(|| name.to_string());
        }
    }
}
