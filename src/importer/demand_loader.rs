// ==========================================
// 储备分配系统 - 需求表解码器
// ==========================================
// 表结构: Код РЦ | Наименование РЦ | Код PLU | Наименование PLU | <日期列>...
// 输出: DemandRecord（每个正数量单元格一条）
// ==========================================

use crate::domain::demand::DemandRecord;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{demand_columns, FieldMapper};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use crate::importer::value_parser::{to_date, to_float, to_int};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct DemandLoader {
    parser: UniversalFileParser,
}

impl DemandLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取并解码需求文件
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<Vec<DemandRecord>> {
        let table = self.parser.parse(path)?;
        let records = self.decode(&table)?;
        info!(rows = table.len(), records = records.len(), "需求表读取完成");
        Ok(records)
    }

    /// 解码原始表格
    ///
    /// 日期列: `Наименование PLU` 之后、表头可解析为日期的列
    pub fn decode(&self, table: &RawTable) -> ImportResult<Vec<DemandRecord>> {
        let mapper = FieldMapper::new(demand_columns::TABLE, &table.headers);
        let idx_rc = mapper.require(&demand_columns::RC)?;
        let idx_rc_name = mapper.require(&demand_columns::RC_NAME)?;
        let idx_product = mapper.require(&demand_columns::PRODUCT)?;
        let idx_product_name = mapper.require(&demand_columns::PRODUCT_NAME)?;

        // 表头非日期的尾随列（如合计列）不产生记录
        let date_columns: Vec<(usize, NaiveDate)> = table
            .headers
            .iter()
            .enumerate()
            .skip(idx_product_name + 1)
            .filter_map(|(idx, header)| to_date(header).map(|date| (idx, date)))
            .collect();
        if date_columns.is_empty() {
            warn!(
                trailing_columns = table.headers.len().saturating_sub(idx_product_name + 1),
                "需求表未识别到日期列"
            );
        }
        debug!(date_columns = date_columns.len(), "需求表日期列识别完成");

        let mut records = Vec::new();
        for row in &table.rows {
            let rc = to_int(RawTable::cell(row, idx_rc));
            let rc_name = RawTable::cell(row, idx_rc_name);
            let product = to_int(RawTable::cell(row, idx_product));
            let product_name = RawTable::cell(row, idx_product_name);

            for (idx, date) in &date_columns {
                let quantity = to_float(RawTable::cell(row, *idx));
                if quantity <= 0.0 {
                    continue;
                }
                records.push(DemandRecord {
                    rc,
                    rc_name: rc_name.to_string(),
                    product,
                    product_name: product_name.to_string(),
                    date: *date,
                    quantity,
                });
            }
        }
        Ok(records)
    }
}
