//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载缩略图链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 形状未识别 **不是** 错误：渲染层会回退到默认矩形。

/// 缩略图处理统一错误类型。
///
/// 该类型会在二进制入口被上转为 `AppError`，最终输出给调用方。
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("文件不存在：{0}")]
    InputNotFound(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("参数错误：{0}")]
    InvalidArgument(String),

    #[error("文件错误：{0}")]
    FileAccess(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl ThumbnailError {
    /// 稳定的错误码，供外壳层（UI / CLI）做分支展示。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "input_not_found",
            Self::Decode(_) => "decode_failure",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::FileAccess(_) => "file_access",
            Self::ResourceLimit(_) => "resource_limit",
        }
    }

    /// 错误大致发生的阶段。
    ///
    /// 只按错误类型粗分，精确阶段请看日志。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) | Self::Decode(_) => "load",
            Self::InvalidArgument(_) => "input",
            Self::FileAccess(_) => "save",
            Self::ResourceLimit(_) => "resize",
        }
    }
}

impl From<ThumbnailError> for String {
    fn from(error: ThumbnailError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ThumbnailError::InputNotFound("a".into()).code(), "input_not_found");
        assert_eq!(ThumbnailError::Decode("a".into()).code(), "decode_failure");
        assert_eq!(ThumbnailError::InvalidArgument("a".into()).code(), "invalid_argument");
        assert_eq!(ThumbnailError::FileAccess("a".into()).code(), "file_access");
        assert_eq!(ThumbnailError::ResourceLimit("a".into()).stage(), "resize");
    }

    #[test]
    fn message_keeps_detail() {
        let message: String = ThumbnailError::FileAccess("/tmp/x.png".into()).into();
        assert!(message.contains("/tmp/x.png"));
    }
}
