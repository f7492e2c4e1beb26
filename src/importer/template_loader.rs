// ==========================================
// 储备分配系统 - 历史模板解码器
// ==========================================
// 输入: 往期输出表（同构表头）
// 输出: TemplateData（按需求键的供应商托盘拆分 + 物流肩距 + 名称/托盘重量）
// ==========================================

use crate::domain::template::TemplateData;
use crate::domain::types::DemandKey;
use crate::engine::template_scaler::round_div;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{template_columns, FieldMapper};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use crate::importer::value_parser::{to_date, to_float, to_int};
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateLoader {
    parser: UniversalFileParser,
}

impl TemplateLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取并解码模板文件
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<TemplateData> {
        let table = self.parser.parse(path)?;
        let template = self.decode(&table)?;
        info!(
            rows = table.len(),
            keys = template.entries.len(),
            shoulders = template.shoulder.len(),
            "模板表读取完成"
        );
        Ok(template)
    }

    /// 解码原始表格
    ///
    /// - 日期无法解析的行跳过
    /// - `паллеты` 为 0 且托盘重量非零时，按 round(体积) / round(托盘重量) 半数进位推算
    /// - 同一需求键 + 供应商的托盘数累加
    pub fn decode(&self, table: &RawTable) -> ImportResult<TemplateData> {
        let mapper = FieldMapper::new(template_columns::TABLE, &table.headers);
        let idx_date = mapper.require(&template_columns::DATE)?;
        let idx_supplier = mapper.require(&template_columns::SUPPLIER)?;
        let idx_supplier_name = mapper.require(&template_columns::SUPPLIER_NAME)?;
        let idx_product = mapper.require(&template_columns::PRODUCT)?;
        let idx_product_name = mapper.require(&template_columns::PRODUCT_NAME)?;
        let idx_rc = mapper.require(&template_columns::RC)?;
        let idx_rc_name = mapper.require(&template_columns::RC_NAME)?;
        let idx_volume = mapper.require(&template_columns::VOLUME)?;
        let idx_shoulder = mapper.require(&template_columns::SHOULDER)?;
        let idx_pallet_weight = mapper.require(&template_columns::PALLET_WEIGHT)?;
        let idx_pallets = mapper.require(&template_columns::PALLETS)?;

        let mut template = TemplateData::new();
        let mut skipped_rows = 0usize;
        for row in &table.rows {
            let date = match to_date(RawTable::cell(row, idx_date)) {
                Some(d) => d,
                None => {
                    skipped_rows += 1;
                    continue;
                }
            };
            let supplier = to_int(RawTable::cell(row, idx_supplier));
            let supplier_name = RawTable::cell(row, idx_supplier_name);
            let product = to_int(RawTable::cell(row, idx_product));
            let product_name = RawTable::cell(row, idx_product_name);
            let rc = to_int(RawTable::cell(row, idx_rc));
            let rc_name = RawTable::cell(row, idx_rc_name);
            let volume = to_float(RawTable::cell(row, idx_volume));
            let shoulder = to_int(RawTable::cell(row, idx_shoulder));
            let pallet_weight = to_float(RawTable::cell(row, idx_pallet_weight));
            let mut pallets = to_int(RawTable::cell(row, idx_pallets));
            if pallets == 0 && pallet_weight != 0.0 {
                pallets = round_div(
                    volume.round_ties_even() as i64,
                    pallet_weight.round_ties_even() as i64,
                );
            }

            template
                .entry_mut(DemandKey::new(rc, product, date))
                .add(supplier, pallets);

            if !supplier_name.is_empty() {
                template
                    .supplier_name
                    .insert(supplier, supplier_name.to_string());
            }
            if !rc_name.is_empty() {
                template.rc_name.insert(rc, rc_name.to_string());
            }
            if !product_name.is_empty() {
                template
                    .product_name
                    .insert(product, product_name.to_string());
            }
            if pallet_weight != 0.0 {
                template.pallet_weight.insert(product, pallet_weight);
            }
            template.record_shoulder(supplier, rc, shoulder);
        }

        if skipped_rows > 0 {
            debug!(skipped_rows, "模板表中日期无效的行已跳过");
        }
        Ok(template)
    }
}
