//! stdio 服务循环：逐行读入请求，逐行写出响应。
//!
//! 每行输入派生一个独立任务，任务只在远程调用处挂起；
//! 并发请求之间不保证回复顺序（见测试中的说明）。
//! 协议流上只允许出现封包行，诊断信息一律走 stderr 日志。

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::codec;
use super::dispatcher::{Dispatcher, Outcome};
use super::{Response, RequestId};

/// stdio 桥接服务器
pub struct StdioServer {
    dispatcher: Arc<Dispatcher>,
}

impl StdioServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// 在标准输入/输出上运行服务循环
    pub async fn run(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// 在任意行式读写流上运行服务循环（测试从这里注入管道）
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut reader = BufReader::new(reader);
        let writer = Arc::new(Mutex::new(writer));
        let mut tasks = JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        let drain = loop {
            let mut line = String::new();
            tokio::select! {
                _ = &mut shutdown => {
                    info!("收到终止信号，放弃在途请求");
                    break false;
                }
                read = reader.read_line(&mut line) => match read {
                    Ok(0) => {
                        info!("输入流结束，客户端断开连接");
                        break true;
                    }
                    Ok(_) => {
                        let dispatcher = Arc::clone(&self.dispatcher);
                        let writer = Arc::clone(&writer);
                        tasks.spawn(handle_line(dispatcher, writer, line));
                    }
                    Err(e) => {
                        error!("读取输入流失败: {}", e);
                        break true;
                    }
                }
            }
        };

        // EOF 后等在途请求收尾；信号路径不等，直接冲刷退出
        if drain {
            while tasks.join_next().await.is_some() {}
        }

        writer.lock().await.flush().await?;
        Ok(())
    }
}

/// 处理一行输入：解码 → 分发 →（可选）写出一行响应
async fn handle_line<W>(dispatcher: Arc<Dispatcher>, writer: Arc<Mutex<W>>, line: String)
where
    W: AsyncWrite + Unpin + Send,
{
    let outcome = match codec::decode(&line) {
        Ok(request) => {
            debug!("收到请求: method={} id={:?}", request.method, request.id);
            dispatcher.dispatch(request).await
        }
        Err(e) => {
            // 解码失败时 ID 不可信，按协议用 null 回复
            error!("请求解析失败: {}", e);
            Outcome::Reply(Response::error(
                RequestId::Null,
                e.jsonrpc_code(),
                "Parse error".to_string(),
            ))
        }
    };

    let response = match outcome {
        Outcome::Reply(response) => response,
        Outcome::NoReply => return,
    };

    match codec::encode(&response) {
        Ok(frame) => {
            let mut writer = writer.lock().await;
            if let Err(e) = writer.write_all(frame.as_bytes()).await {
                error!("写出响应失败: {}", e);
                return;
            }
            if let Err(e) = writer.write_all(b"\n").await {
                error!("写出响应失败: {}", e);
                return;
            }
            if let Err(e) = writer.flush().await {
                error!("冲刷输出流失败: {}", e);
                return;
            }
            debug!("已发送响应: id={:?}", response.id);
        }
        Err(e) => error!("{}", e),
    }
}

/// 等待 SIGINT 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("无法监听 Ctrl-C 信号: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("无法监听 SIGTERM 信号: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
