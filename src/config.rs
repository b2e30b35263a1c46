//! 启动配置：进程启动时从环境读取一次，之后不可变。
//!
//! 分发逻辑不直接读环境变量，只接受这里构造好的配置值。

use url::Url;

use crate::errors::BridgeError;

/// 默认远程 API 端点
pub const DEFAULT_ENDPOINT: &str = "https://cookwith.co/api/mcp";

/// 转发模式，进程生命周期内固定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// 所有请求一律转发到远程端点
    Proxy,
    /// 协议协商与工具目录本地应答，工具执行转发
    Hybrid,
}

impl ForwardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardMode::Proxy => "proxy",
            ForwardMode::Hybrid => "hybrid",
        }
    }
}

/// 桥接进程配置
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// 远程端点；None 表示远程路径在结构上被禁用（COOKWITH_API_URL 置空）
    pub endpoint: Option<Url>,
    pub mode: ForwardMode,
    /// 仅影响 stderr 日志级别，不影响协议行为
    pub verbose: bool,
}

impl BridgeConfig {
    /// 从环境变量读取配置
    ///
    /// - `COOKWITH_API_URL`：远程端点，缺省为 DEFAULT_ENDPOINT，空串禁用远程路径
    /// - `COOKWITH_USE_HTTP`：为 "true" 时进入 proxy 模式，缺省 hybrid
    /// - `MCP_DEBUG`：为 "true" 时提升日志级别
    pub fn from_env() -> Result<Self, BridgeError> {
        let raw_endpoint =
            std::env::var("COOKWITH_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let endpoint = if raw_endpoint.trim().is_empty() {
            None
        } else {
            Some(Url::parse(&raw_endpoint)?)
        };

        let mode = if env_flag("COOKWITH_USE_HTTP") {
            ForwardMode::Proxy
        } else {
            ForwardMode::Hybrid
        };

        Ok(Self {
            endpoint,
            mode,
            verbose: env_flag("MCP_DEBUG"),
        })
    }

    /// 校验配置组合
    ///
    /// proxy 模式没有任何本地应答路径，必须有远程端点。
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.mode == ForwardMode::Proxy && self.endpoint.is_none() {
            return Err(BridgeError::InvalidConfig(
                "proxy 模式必须配置远程端点 (COOKWITH_API_URL)".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "true").unwrap_or(false)
}
