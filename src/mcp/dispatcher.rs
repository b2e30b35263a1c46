//! 请求分发核心：按模式决定本地应答、远程转发还是抑制回复。
//!
//! `dispatch` 是全函数——任何请求都产出响应封包或 NoReply 哨兵，
//! 内部失败一律就地转换为错误封包，绝不向上抛。

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use super::remote::{RemoteCall, RemoteOutcome};
use super::{error_codes, Request, Response, MCP_VERSION, SERVER_NAME, SERVER_VERSION};
use crate::config::ForwardMode;
use crate::tools::{recipe_catalog, ToolDescriptor};

/// 已知方法的封闭枚举，新增方法必须显式扩展这里
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    NotificationsInitialized,
    Other(String),
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "initialize" => Method::Initialize,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            "notifications/initialized" => Method::NotificationsInitialized,
            other => Method::Other(other.to_string()),
        }
    }
}

/// 分发结果：要么发出一行响应，要么什么都不发
#[derive(Debug)]
pub enum Outcome {
    Reply(Response),
    /// 无回复哨兵（通知，或远程 204）
    NoReply,
}

/// 请求分发器
///
/// 模式与工具目录在构造时固定，分发过程中不读任何进程级可变状态。
pub struct Dispatcher {
    mode: ForwardMode,
    remote: Option<Arc<dyn RemoteCall>>,
    catalog: Vec<ToolDescriptor>,
}

impl Dispatcher {
    pub fn new(mode: ForwardMode, remote: Option<Arc<dyn RemoteCall>>) -> Self {
        Self {
            mode,
            remote,
            catalog: recipe_catalog(),
        }
    }

    /// 分发一个请求，永不失败
    pub async fn dispatch(&self, request: Request) -> Outcome {
        match self.mode {
            // proxy 模式下一切交给远程，initialize 也不例外
            ForwardMode::Proxy => self.forward(request).await,
            ForwardMode::Hybrid => self.dispatch_hybrid(request).await,
        }
    }

    async fn dispatch_hybrid(&self, request: Request) -> Outcome {
        match Method::parse(&request.method) {
            Method::Initialize => Outcome::Reply(self.handle_initialize(&request)),
            Method::ToolsList => Outcome::Reply(self.handle_tools_list(&request)),
            // 本地没有工具执行器，工具调用始终走远程
            Method::ToolsCall => self.forward(request).await,
            Method::NotificationsInitialized => {
                debug!("收到 initialized 通知，不发送回复");
                Outcome::NoReply
            }
            Method::Other(name) => {
                warn!("未知方法: {}", name);
                Outcome::Reply(Response::error(
                    request.reply_id(),
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {}", name),
                ))
            }
        }
    }

    /// 协议版本协商：客户端带了版本就回声，否则用内置默认版本
    fn handle_initialize(&self, request: &Request) -> Response {
        let protocol_version = request
            .params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(MCP_VERSION);

        Response::success(
            request.reply_id(),
            json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    /// 静态工具目录，顺序固定；参数校验交给实际执行方
    fn handle_tools_list(&self, request: &Request) -> Response {
        Response::success(request.reply_id(), json!({ "tools": self.catalog }))
    }

    /// 转发路径：一次远程调用，失败就地合成错误封包
    async fn forward(&self, request: Request) -> Outcome {
        let reply_id = request.reply_id();

        let Some(remote) = &self.remote else {
            // 远程路径在结构上被禁用时的固定错误
            return Outcome::Reply(Response::error(
                reply_id,
                error_codes::METHOD_NOT_FOUND,
                "Tool execution requires a remote endpoint".to_string(),
            ));
        };

        match remote.forward(&request).await {
            RemoteOutcome::Response(envelope) => Outcome::Reply(envelope),
            RemoteOutcome::NoReply => Outcome::NoReply,
            RemoteOutcome::Failed(reason) => Outcome::Reply(Response::error(
                reply_id,
                error_codes::INTERNAL_ERROR,
                reason,
            )),
        }
    }
}
