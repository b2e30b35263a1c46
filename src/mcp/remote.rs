//! 远程调用边界：把请求封包原样 POST 到远程端点。
//!
//! 返回值是封闭的三态枚举，转发路径永远不向调用方抛错；
//! 不做重试，失败原样上浮为错误封包（由分发器合成）。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use super::{Request, Response};
use crate::errors::BridgeError;

/// 转发时携带的身份标识
pub const USER_AGENT: &str = concat!("cookwith-mcp/", env!("CARGO_PKG_VERSION"));

/// 请求超时（含连接与响应）
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 一次远程调用的结果
#[derive(Debug)]
pub enum RemoteOutcome {
    /// 远程返回了响应封包，原样透传
    Response(Response),
    /// 远程以 204 声明无需回复
    NoReply,
    /// 传输或协议层失败，携带失败描述
    Failed(String),
}

/// 远程调用接口，测试中可替换为脚本化实现
#[async_trait]
pub trait RemoteCall: Send + Sync {
    async fn forward(&self, request: &Request) -> RemoteOutcome;
}

/// 基于 reqwest 的远程 HTTP 客户端
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRemote {
    pub fn new(endpoint: Url) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteCall for HttpRemote {
    async fn forward(&self, request: &Request) -> RemoteOutcome {
        debug!("转发请求到远程端点: method={}", request.method);

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("远程请求失败: {}", e);
                return RemoteOutcome::Failed(e.to_string());
            }
        };

        // 204 是远程声明"无需回复"的显式信号
        if response.status() == StatusCode::NO_CONTENT {
            debug!("远程返回 204，不发送回复");
            return RemoteOutcome::NoReply;
        }

        match response.json::<Response>().await {
            Ok(envelope) => RemoteOutcome::Response(envelope),
            Err(e) => {
                warn!("远程响应解析失败: {}", e);
                RemoteOutcome::Failed(format!("Invalid response envelope from remote: {}", e))
            }
        }
    }
}
