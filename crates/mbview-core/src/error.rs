//! 统一错误类型定义.
//!
//! 所有 mbview crate 共用的错误类型, 支持跨模块传播.

use std::path::PathBuf;

use thiserror::Error;

/// mbview 统一错误类型
#[derive(Debug, Error)]
pub enum MbError {
    /// 候选文件不存在
    #[error("找不到文件: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 记录字节数不足, 无法解码固定长度字段
    #[error("记录不完整: 需要 {expected} 字节, 实际 {actual} 字节")]
    MalformedRecord { expected: usize, actual: usize },

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 显示窗口错误
    #[error("显示错误: {0}")]
    Display(String),

    /// 图像导出错误
    #[error("导出错误: {0}")]
    Export(String),

    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),
}

/// mbview 统一 Result 类型
pub type MbResult<T> = Result<T, MbError>;
