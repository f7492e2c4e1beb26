// ==========================================
// 储备分配系统 - 储备表解码器
// ==========================================
// 输出: CatalogInfo（名称、托盘重量、整车托盘上限、储备量）
// 红线: 只登记非零代码/非零取值
// ==========================================

use crate::domain::catalog::CatalogInfo;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{reserve_columns, FieldMapper};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use crate::importer::value_parser::{to_float, to_int};
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReserveLoader {
    parser: UniversalFileParser,
}

impl ReserveLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取并解码储备文件
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<CatalogInfo> {
        let table = self.parser.parse(path)?;
        let catalog = self.decode(&table)?;
        info!(
            rows = table.len(),
            suppliers = catalog.supplier_name.len(),
            products = catalog.product_name.len(),
            reserves = catalog.reserve.len(),
            "储备表读取完成"
        );
        Ok(catalog)
    }

    /// 解码原始表格
    ///
    /// 整车托盘上限取最大值列，为 0 或缺失时取最小值列
    pub fn decode(&self, table: &RawTable) -> ImportResult<CatalogInfo> {
        let mapper = FieldMapper::new(reserve_columns::TABLE, &table.headers);
        let idx_supplier = mapper.require(&reserve_columns::SUPPLIER)?;
        let idx_product = mapper.require(&reserve_columns::PRODUCT)?;
        let idx_supplier_name = mapper.locate(&reserve_columns::SUPPLIER_NAME);
        let idx_product_name = mapper.locate(&reserve_columns::PRODUCT_NAME);
        let idx_reserve = mapper.locate(&reserve_columns::RESERVE);
        let idx_max_pallets = mapper.locate(&reserve_columns::MAX_PALLETS);
        let idx_min_pallets = mapper.locate(&reserve_columns::MIN_PALLETS);
        let idx_pallet_weight = mapper.locate(&reserve_columns::PALLET_WEIGHT);

        let text = |row: &[String], idx: Option<usize>| -> String {
            idx.map(|i| RawTable::cell(row, i).to_string())
                .unwrap_or_default()
        };
        let int = |row: &[String], idx: Option<usize>| -> i64 {
            idx.map(|i| to_int(RawTable::cell(row, i))).unwrap_or(0)
        };
        let float = |row: &[String], idx: Option<usize>| -> f64 {
            idx.map(|i| to_float(RawTable::cell(row, i))).unwrap_or(0.0)
        };

        let mut catalog = CatalogInfo::new();
        for row in table.rows.iter().map(Vec::as_slice) {
            let supplier = to_int(RawTable::cell(row, idx_supplier));
            let product = to_int(RawTable::cell(row, idx_product));
            let supplier_name = text(row, idx_supplier_name);
            let product_name = text(row, idx_product_name);
            let reserve = float(row, idx_reserve);
            let mut max_pallets = int(row, idx_max_pallets);
            if max_pallets == 0 {
                max_pallets = int(row, idx_min_pallets);
            }
            let pallet_weight = float(row, idx_pallet_weight);

            if supplier != 0 {
                if !supplier_name.is_empty() {
                    catalog.supplier_name.insert(supplier, supplier_name);
                }
                if max_pallets != 0 {
                    catalog.max_pallets.insert(supplier, max_pallets);
                }
            }
            if product != 0 {
                if !product_name.is_empty() {
                    catalog.product_name.insert(product, product_name);
                }
                if pallet_weight != 0.0 {
                    catalog.pallet_weight.insert(product, pallet_weight);
                }
            }
            catalog.add_reserve(supplier, product, reserve);
        }
        Ok(catalog)
    }
}
