// ==========================================
// 港口通航压力指数系统 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出目录创建失败 ({path}): {message}")]
    DirectoryError { path: String, message: String },

    #[error("文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("JSON 序列化失败 ({path}): {message}")]
    SerializeError { path: String, message: String },

    #[error("结果落盘失败 ({path}, 已落盘 {committed}/{total}): {message}")]
    CommitError {
        path: String,
        committed: usize,
        total: usize,
        message: String,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;
