use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP 协议默认版本（客户端未指定时协商使用）
pub const MCP_VERSION: &str = "2025-03-26";

/// 服务器标识
pub const SERVER_NAME: &str = "cookwith-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 请求/响应 ID，JSON-RPC 2.0 允许字符串、数字或 null
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Num(i64),
    Str(String),
    #[default]
    Null,
}

/// JSON-RPC 请求封包
///
/// `id` 缺失或为 null 表示通知（notification），协议上不期待回复。
/// 未知字段通过 `extra` 原样保留，转发时不丢失。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub extra: Option<Value>,
}

/// JSON-RPC 响应封包
///
/// `result` 与 `error` 互斥，只能通过 `success`/`error` 构造器创建本地响应；
/// 远程返回的封包原样透传。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    #[serde(default)]
    pub id: RequestId,
    #[serde(flatten)]
    pub extra: Option<Value>,
}

/// JSON-RPC 错误对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

impl Request {
    /// 回复时应使用的 ID（通知回落为 null）
    pub fn reply_id(&self) -> RequestId {
        self.id.clone().unwrap_or(RequestId::Null)
    }

    /// 是否为通知（无 ID）
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

impl Response {
    /// 创建一个成功响应
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            result: Some(result),
            error: None,
            id,
            extra: None,
        }
    }

    /// 创建一个错误响应
    pub fn error(id: RequestId, code: i64, message: String) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            result: None,
            error: Some(ErrorObject {
                code,
                message,
                data: None,
            }),
            id,
            extra: None,
        }
    }
}

// 错误代码定义
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

pub mod codec;
pub mod dispatcher;
pub mod remote;
pub mod server;

pub use dispatcher::{Dispatcher, Outcome};
pub use remote::{HttpRemote, RemoteCall, RemoteOutcome};
pub use server::StdioServer;
