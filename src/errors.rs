use thiserror::Error;

use crate::mcp::error_codes;

/// 进程级错误（配置、启动阶段），按请求的错误不走这里
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("端点 URL 无效: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// 行帧编解码错误
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("请求行解析失败: {0}")]
    Decode(serde_json::Error),

    #[error("响应序列化失败: {0}")]
    Encode(serde_json::Error),
}

impl CodecError {
    /// 映射到 JSON-RPC 错误码
    pub fn jsonrpc_code(&self) -> i64 {
        match self {
            CodecError::Decode(_) => error_codes::PARSE_ERROR,
            CodecError::Encode(_) => error_codes::INTERNAL_ERROR,
        }
    }
}
