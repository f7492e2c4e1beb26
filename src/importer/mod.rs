// ==========================================
// 储备分配系统 - 导入层
// ==========================================
// 职责: 外部表格 → 领域数据；输出行 → 结果文件
// 支持: Excel (.xlsx/.xls), CSV；输出 .xlsx / .csv
// ==========================================

// 模块声明
pub mod demand_loader;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod output_writer;
pub mod reserve_loader;
pub mod template_loader;
pub mod value_parser;

// 重导出核心类型
pub use demand_loader::DemandLoader;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ColumnSpec, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawTable, UniversalFileParser};
pub use output_writer::{sorted_rows, OutputWriter};
pub use reserve_loader::ReserveLoader;
pub use template_loader::TemplateLoader;
