// ==========================================
// 储备分配系统 - 输出表写出
// ==========================================
// 格式: 按扩展名选择 .xlsx（工作表 Распределение，日期为日期单元格）或 .csv（UTF-8）
// 表头: 与模板表同构并附加 ТС/тс 两列，输出工作簿可直接作为下次运行的模板
// 排序: (日期, 供应商, 车次, 配送中心, 商品)
// ==========================================

use crate::domain::allocation::OutputRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::output_columns;
use chrono::Datelike;
use csv::WriterBuilder;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs::File;
use std::path::Path;
use tracing::{info, instrument};

/// 输出工作表名称
pub const OUTPUT_SHEET: &str = "Распределение";

/// 输出行排序（稳定排序，不改变入参）
pub fn sorted_rows(rows: &[OutputRow]) -> Vec<&OutputRow> {
    let mut sorted: Vec<&OutputRow> = rows.iter().collect();
    sorted.sort_by_key(|r| (r.date, r.supplier, r.truck_id, r.rc, r.product));
    sorted
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter;

impl OutputWriter {
    pub fn new() -> Self {
        Self
    }

    /// 写出输出表
    ///
    /// # 参数
    /// - `path`: 输出路径，扩展名决定格式（.xlsx / .csv）
    /// - `rows`: 输出行（写出前排序）
    ///
    /// # 返回
    /// 写出的数据行数
    #[instrument(skip_all, fields(path = %path.display(), rows = rows.len()))]
    pub fn write(&self, path: &Path, rows: &[OutputRow]) -> ImportResult<usize> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ImportError::WriteError(format!("{}: {}", parent.display(), e)))?;
        }

        let sorted = sorted_rows(rows);
        if ext == "xlsx" {
            Self::write_xlsx(path, &sorted)?;
        } else {
            Self::write_csv(path, &sorted)?;
        }

        info!(path = %path.display(), rows = sorted.len(), "输出表已保存");
        Ok(sorted.len())
    }

    fn write_csv(path: &Path, rows: &[&OutputRow]) -> ImportResult<()> {
        let file = File::create(path)
            .map_err(|e| ImportError::WriteError(format!("{}: {}", path.display(), e)))?;
        let mut writer = WriterBuilder::new().from_writer(file);

        writer.write_record(output_columns::HEADERS)?;
        for row in rows {
            writer.write_record(Self::record(row))?;
        }
        writer
            .flush()
            .map_err(|e| ImportError::WriteError(e.to_string()))
    }

    fn write_xlsx(path: &Path, rows: &[&OutputRow]) -> ImportResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let sheet = workbook.add_worksheet();
        sheet.set_name(OUTPUT_SHEET)?;
        for (col, header) in output_columns::HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, row) in rows.iter().enumerate() {
            let r = idx as u32 + 1;
            let date = ExcelDateTime::from_ymd(
                row.date.year() as u16,
                row.date.month() as u8,
                row.date.day() as u8,
            )?;
            sheet.write_datetime_with_format(r, 0, &date, &date_format)?;
            sheet.write_number(r, 1, row.supplier as f64)?;
            sheet.write_string(r, 2, row.supplier_name.as_str())?;
            sheet.write_number(r, 3, row.product as f64)?;
            sheet.write_string(r, 4, row.product_name.as_str())?;
            sheet.write_number(r, 5, row.rc as f64)?;
            sheet.write_string(r, 6, row.rc_name.as_str())?;
            sheet.write_number(r, 7, row.volume)?;
            sheet.write_number(r, 8, row.truck_id as f64)?;
            sheet.write_number(r, 9, row.shoulder as f64)?;
            sheet.write_number(r, 10, row.pallet_weight)?;
            sheet.write_number(r, 11, row.pallets as f64)?;
            // 第 13 列 (тс) 留空
        }

        workbook.save(path)?;
        Ok(())
    }

    fn record(row: &OutputRow) -> [String; 13] {
        [
            row.date.format("%Y-%m-%d").to_string(),
            row.supplier.to_string(),
            row.supplier_name.clone(),
            row.product.to_string(),
            row.product_name.clone(),
            row.rc.to_string(),
            row.rc_name.clone(),
            row.volume.to_string(),
            row.truck_id.to_string(),
            row.shoulder.to_string(),
            row.pallet_weight.to_string(),
            row.pallets.to_string(),
            String::new(),
        ]
    }
}
