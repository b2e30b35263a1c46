use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use url::Url;

use cookwith_mcp::config::{BridgeConfig, ForwardMode};
use cookwith_mcp::mcp::{Dispatcher, HttpRemote, RemoteCall, StdioServer};

/// Cookwith MCP 桥接进程 - stdio 模式的菜谱工具服务
#[derive(Parser)]
#[command(name = "cookwith-mcp")]
#[command(about = "Cookwith MCP 桥接进程 - 本地协议协商，远程菜谱生成")]
#[command(version)]
struct Cli {
    /// 远程 API 端点（覆盖 COOKWITH_API_URL，空串禁用远程路径）
    #[arg(long)]
    endpoint: Option<String>,

    /// 纯代理模式：所有请求转发到远程端点（覆盖 COOKWITH_USE_HTTP）
    #[arg(long)]
    proxy: bool,

    /// 启用详细日志（覆盖 MCP_DEBUG）
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = BridgeConfig::from_env()?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = if endpoint.trim().is_empty() {
            None
        } else {
            Some(Url::parse(endpoint)?)
        };
    }
    if cli.proxy {
        config.mode = ForwardMode::Proxy;
    }
    if cli.verbose {
        config.verbose = true;
    }
    config.validate()?;

    // 初始化日志；诊断信息只走 stderr，stdout 留给协议流
    let default_filter = if config.verbose {
        "cookwith_mcp=debug"
    } else {
        "cookwith_mcp=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()))
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 启动 Cookwith MCP 桥接进程...");
    info!("📡 转发模式: {}", config.mode.as_str());
    match &config.endpoint {
        Some(url) => info!("🌐 远程端点: {}", url),
        None => info!("🌐 远程端点: 未配置（工具调用将返回错误）"),
    }

    let remote: Option<Arc<dyn RemoteCall>> = match &config.endpoint {
        Some(url) => Some(Arc::new(HttpRemote::new(url.clone())?)),
        None => None,
    };

    let dispatcher = Dispatcher::new(config.mode, remote);
    let server = StdioServer::new(dispatcher);
    server.run().await?;

    info!("👋 桥接进程退出");
    Ok(())
}
