//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError`，供二进制入口与未来的 UI 外壳统一处理，
//! 替代各处分散的 `.map_err(|e| e.to_string())`、`expect()` 等不一致模式。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ThumbnailError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，外壳层拿到的错误格式一致。

use serde::Serialize;

use crate::thumbnail::ThumbnailError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 缩略图流水线错误（加载 / 缩放 / 合成 / 保存）
    #[error("{0}")]
    Thumbnail(#[from] ThumbnailError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 请求文件或命令行参数无效
    #[error("请求无效: {0}")]
    Request(String),
}

impl AppError {
    /// 稳定错误码：流水线错误沿用 `ThumbnailError::code`。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Thumbnail(error) => error.code(),
            Self::Io(_) => "io",
            Self::Request(_) => "invalid_request",
        }
    }
}

/// 外壳层要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
