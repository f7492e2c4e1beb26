// ==========================================
// 储备分配系统 - API层错误类型
// ==========================================
// 职责: 汇总导入层/配置层错误，转换为面向调用方的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 下层错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("批量清单读取失败 ({path}): {message}")]
    Manifest { path: String, message: String },
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
