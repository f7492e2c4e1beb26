// ==========================================
// 储备分配系统 - 字段映射器实现
// ==========================================
// 职责: 业务表头（俄文）→ 列下标映射，支持别名
// 说明: 表头在解析阶段已 trim，带尾随空格的源表头在此以 trim 后形式出现
// ==========================================

use crate::importer::error::{ImportError, ImportResult};

// ==========================================
// ColumnSpec - 列定义
// ==========================================

/// 逻辑列: 标准列名 + 可接受的别名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl ColumnSpec {
    pub const fn new(name: &'static str) -> Self {
        Self { name, aliases: &[] }
    }

    pub const fn with_aliases(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }

    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header == self.name || self.aliases.iter().any(|alias| header == alias.trim())
    }
}

// ==========================================
// 表结构定义
// ==========================================

/// 需求表
pub mod demand_columns {
    use super::ColumnSpec;

    pub const TABLE: &str = "需求表";
    pub const RC: ColumnSpec = ColumnSpec::new("Код РЦ");
    pub const RC_NAME: ColumnSpec = ColumnSpec::new("Наименование РЦ");
    pub const PRODUCT: ColumnSpec = ColumnSpec::new("Код PLU");
    pub const PRODUCT_NAME: ColumnSpec = ColumnSpec::new("Наименование PLU");
}

/// 储备表
pub mod reserve_columns {
    use super::ColumnSpec;

    pub const TABLE: &str = "储备表";
    pub const SUPPLIER: ColumnSpec = ColumnSpec::new("Код поставщика");
    pub const SUPPLIER_NAME: ColumnSpec = ColumnSpec::new("Наименование поставщика");
    pub const PRODUCT: ColumnSpec = ColumnSpec::new("Код PLU");
    pub const PRODUCT_NAME: ColumnSpec = ColumnSpec::new("Наименование PLU");
    pub const RESERVE: ColumnSpec = ColumnSpec::new("Резерв");
    pub const MAX_PALLETS: ColumnSpec = ColumnSpec::with_aliases(
        "Максимальное кол-во паллет в машине (макс. квант), шт.",
        &["Макс. квант"],
    );
    pub const MIN_PALLETS: ColumnSpec = ColumnSpec::with_aliases(
        "Минимальное кол-во паллет в машине (мин. квант), шт.",
        &["Мин. квант"],
    );
    pub const PALLET_WEIGHT: ColumnSpec = ColumnSpec::new("Макс. вес товара на одной паллете, кг");
}

/// 历史模板表（与输出表同构，少 ТС/тс 两列）
pub mod template_columns {
    use super::ColumnSpec;

    pub const TABLE: &str = "模板表";
    pub const DATE: ColumnSpec = ColumnSpec::new("Дата поставки");
    pub const SUPPLIER: ColumnSpec = ColumnSpec::new("SAP поставщика");
    pub const SUPPLIER_NAME: ColumnSpec = ColumnSpec::new("Поставщик");
    pub const PRODUCT: ColumnSpec = ColumnSpec::new("PLU");
    pub const PRODUCT_NAME: ColumnSpec =
        ColumnSpec::with_aliases("Наименование", &["Наименование PLU"]);
    pub const RC: ColumnSpec = ColumnSpec::new("РЦ");
    pub const RC_NAME: ColumnSpec = ColumnSpec::new("Наименование РЦ");
    pub const VOLUME: ColumnSpec = ColumnSpec::new("Объем");
    pub const SHOULDER: ColumnSpec = ColumnSpec::new("лог плечо");
    pub const PALLET_WEIGHT: ColumnSpec = ColumnSpec::new("Квант паллет");
    pub const PALLETS: ColumnSpec = ColumnSpec::new("паллеты");
}

/// 输出表表头（顺序即列顺序）
pub mod output_columns {
    pub const HEADERS: [&str; 13] = [
        "Дата поставки",
        "SAP поставщика",
        "Поставщик",
        "PLU",
        "Наименование ",
        "РЦ",
        "Наименование РЦ",
        "Объем",
        "ТС",
        "лог плечо",
        "Квант паллет",
        "паллеты",
        "тс",
    ];
}

// ==========================================
// FieldMapper - 表头定位器
// ==========================================

pub struct FieldMapper<'a> {
    table: &'static str,
    headers: &'a [String],
}

impl<'a> FieldMapper<'a> {
    pub fn new(table: &'static str, headers: &'a [String]) -> Self {
        Self { table, headers }
    }

    /// 定位列（首个匹配的表头）
    pub fn locate(&self, column: &ColumnSpec) -> Option<usize> {
        self.headers.iter().position(|h| column.matches(h))
    }

    /// 定位必需列，缺失时报错
    pub fn require(&self, column: &ColumnSpec) -> ImportResult<usize> {
        self.locate(column).ok_or_else(|| ImportError::MissingColumn {
            table: self.table.to_string(),
            column: column.name.to_string(),
        })
    }
}
