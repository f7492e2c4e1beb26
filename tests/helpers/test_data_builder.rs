// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use reserve_planner::domain::{CatalogInfo, DemandKey, DemandRecord, TemplateData};
use std::path::{Path, PathBuf};

/// 2025-07-<day>
pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
}

// ==========================================
// DemandRecord 构建器
// ==========================================

pub struct DemandBuilder {
    rc: i64,
    product: i64,
    day: u32,
    quantity: f64,
}

impl DemandBuilder {
    pub fn new(rc: i64, product: i64) -> Self {
        Self {
            rc,
            product,
            day: 1,
            quantity: 0.0,
        }
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = day;
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn build(self) -> DemandRecord {
        DemandRecord {
            rc: self.rc,
            rc_name: format!("РЦ {}", self.rc),
            product: self.product,
            product_name: format!("PLU {}", self.product),
            date: date(self.day),
            quantity: self.quantity,
        }
    }
}

// ==========================================
// CatalogInfo 构建器
// ==========================================

#[derive(Default)]
pub struct CatalogBuilder {
    catalog: CatalogInfo,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 供应商（名称 + 整车托盘上限）
    pub fn supplier(mut self, supplier: i64, max_pallets: i64) -> Self {
        self.catalog
            .supplier_name
            .insert(supplier, format!("Поставщик {}", supplier));
        self.catalog.max_pallets.insert(supplier, max_pallets);
        self
    }

    pub fn pallet_weight(mut self, product: i64, weight: f64) -> Self {
        self.catalog.pallet_weight.insert(product, weight);
        self
    }

    pub fn reserve(mut self, supplier: i64, product: i64, value: f64) -> Self {
        self.catalog.add_reserve(supplier, product, value);
        self
    }

    pub fn build(self) -> CatalogInfo {
        self.catalog
    }
}

// ==========================================
// TemplateData 构建器
// ==========================================

#[derive(Default)]
pub struct TemplateBuilder {
    template: TemplateData,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 历史记录: (配送中心, 商品, 日期) 下某供应商的托盘数
    pub fn row(mut self, rc: i64, product: i64, day: u32, supplier: i64, pallets: i64) -> Self {
        self.template
            .entry_mut(DemandKey::new(rc, product, date(day)))
            .add(supplier, pallets);
        self
    }

    pub fn shoulder(mut self, supplier: i64, rc: i64, shoulder: i64) -> Self {
        self.template.record_shoulder(supplier, rc, shoulder);
        self
    }

    pub fn supplier_name(mut self, supplier: i64, name: &str) -> Self {
        self.template.supplier_name.insert(supplier, name.to_string());
        self
    }

    pub fn build(self) -> TemplateData {
        self.template
    }
}

// ==========================================
// 文件夹具
// ==========================================

/// 写出 CSV 夹具文件
pub fn write_csv(dir: &Path, name: &str, headers: &[&str], rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(headers).unwrap();
    for row in rows {
        writer.write_record(*row).unwrap();
    }
    writer.flush().unwrap();
    path
}

pub const DEMAND_HEADERS: [&str; 6] = [
    "Код РЦ",
    "Наименование РЦ",
    "Код PLU",
    "Наименование PLU",
    "2025-07-01",
    "2025-07-02",
];

pub const RESERVE_HEADERS: [&str; 7] = [
    "Код поставщика",
    "Наименование поставщика",
    "Код PLU",
    "Наименование PLU",
    "Резерв",
    "Максимальное кол-во паллет в машине (макс. квант), шт.",
    "Макс. вес товара на одной паллете, кг",
];

pub const TEMPLATE_HEADERS: [&str; 11] = [
    "Дата поставки",
    "SAP поставщика",
    "Поставщик",
    "PLU",
    "Наименование ",
    "РЦ",
    "Наименование РЦ",
    "Объем",
    "лог плечо",
    "Квант паллет",
    "паллеты",
];
