//! # Cookwith MCP Bridge
//!
//! 基于 MCP (Model Context Protocol) 的 stdio 桥接进程：在标准输入/输出上
//! 逐行收发 JSON-RPC 2.0 封包，协议协商与工具目录本地应答，菜谱工具的
//! 实际执行转发到远程 HTTP 端点。
//!
//! ## 特性
//!
//! - 🔀 **双模式分发** - hybrid 模式本地应答协议方法，proxy 模式全量转发
//! - 🍳 **菜谱工具目录** - 静态声明 generate_recipe / transform_recipe
//! - 📡 **远程转发** - 工具调用原样 POST 到远程端点，204 按通知抑制回复
//! - 🛡️ **全函数分发** - 任何请求都产出响应或无回复哨兵，进程不会因单个请求崩溃
//!
//! ## 快速开始
//!
//! ```no_run
//! use cookwith_mcp::config::BridgeConfig;
//! use cookwith_mcp::mcp::{Dispatcher, StdioServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BridgeConfig::from_env()?;
//!     let dispatcher = Dispatcher::new(config.mode, None);
//!     StdioServer::new(dispatcher).run().await
//! }
//! ```

pub mod config;
pub mod errors;
pub mod mcp;
pub mod tools;

pub use config::{BridgeConfig, ForwardMode};
pub use errors::{BridgeError, CodecError};
