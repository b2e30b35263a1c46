use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use cookwith_mcp::config::ForwardMode;
use cookwith_mcp::mcp::{
    error_codes, Dispatcher, Outcome, RemoteCall, RemoteOutcome, Request, RequestId, Response,
};

/// 脚本化远程桩：记录调用次数，按预设剧本返回
struct ScriptedRemote {
    calls: AtomicUsize,
    script: Script,
}

enum Script {
    /// 以给定 JSON 封包响应
    Respond(Value),
    /// 模拟远程 204
    NoContent,
    /// 模拟传输失败
    Fail(String),
    /// 按请求参数里的 delay_ms 睡眠后回声（用于乱序测试）
    DelayedEcho,
}

impl ScriptedRemote {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCall for ScriptedRemote {
    async fn forward(&self, request: &Request) -> RemoteOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Respond(value) => {
                RemoteOutcome::Response(serde_json::from_value(value.clone()).unwrap())
            }
            Script::NoContent => RemoteOutcome::NoReply,
            Script::Fail(reason) => RemoteOutcome::Failed(reason.clone()),
            Script::DelayedEcho => {
                let delay = request
                    .params
                    .as_ref()
                    .and_then(|p| p.get("delay_ms"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                RemoteOutcome::Response(Response::success(request.reply_id(), json!({"ok": true})))
            }
        }
    }
}

fn request(value: Value) -> Request {
    serde_json::from_value(value).unwrap()
}

fn expect_reply(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Reply(response) => response,
        Outcome::NoReply => panic!("期望响应封包，得到 NoReply"),
    }
}

#[tokio::test]
async fn test_initialize_echoes_requested_version() {
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, None);
    let outcome = dispatcher
        .dispatch(request(json!({
            "jsonrpc": "2.0",
            "method": "initialize",
            "params": {"protocolVersion": "2099-01-01", "clientInfo": {"name": "c", "version": "1"}},
            "id": "init-1"
        })))
        .await;

    let response = expect_reply(outcome);
    assert_eq!(response.id, RequestId::Str("init-1".to_string()));
    let result = response.result.unwrap();
    // 回声客户端版本，而不是覆盖
    assert_eq!(result["protocolVersion"], "2099-01-01");
    assert_eq!(result["serverInfo"]["name"], "cookwith-mcp");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_initialize_defaults_version_without_params() {
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, None);
    let outcome = dispatcher
        .dispatch(request(json!({
            "jsonrpc": "2.0",
            "method": "initialize",
            "id": 1
        })))
        .await;

    let response = expect_reply(outcome);
    assert_eq!(
        response.result.unwrap()["protocolVersion"],
        "2025-03-26"
    );
}

#[tokio::test]
async fn test_tools_list_returns_stable_catalog() {
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, None);

    let first = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0", "method": "tools/list", "params": {}, "id": 1
            })))
            .await,
    );
    let second = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0", "method": "tools/list", "params": {}, "id": 2
            })))
            .await,
    );

    let tools = first.result.as_ref().unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["generate_recipe", "transform_recipe"]);

    // 重复调用目录内容与顺序不变
    assert_eq!(
        first.result.unwrap()["tools"],
        second.result.unwrap()["tools"]
    );
}

#[tokio::test]
async fn test_unknown_method_names_the_offender() {
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, None);
    let response = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0", "method": "foo/bar", "id": 5
            })))
            .await,
    );

    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
    assert!(error.message.contains("foo/bar"));
    assert_eq!(response.id, RequestId::Num(5));
}

#[tokio::test]
async fn test_initialized_notification_is_suppressed() {
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, None);
    let outcome = dispatcher
        .dispatch(request(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized"
        })))
        .await;
    assert!(matches!(outcome, Outcome::NoReply));
}

#[tokio::test]
async fn test_tools_call_forwards_exactly_once() {
    let remote = ScriptedRemote::new(Script::Respond(json!({
        "jsonrpc": "2.0",
        "result": {"content": [{"type": "text", "text": "番茄炒蛋"}]},
        "id": 7
    })));
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, Some(remote.clone()));

    let response = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0",
                "method": "tools/call",
                "params": {"name": "generate_recipe", "arguments": {"prompt": "晚餐"}},
                "id": 7
            })))
            .await,
    );

    assert_eq!(remote.calls(), 1);
    assert_eq!(response.id, RequestId::Num(7));
    assert!(response.result.is_some());
}

#[tokio::test]
async fn test_remote_transport_failure_becomes_internal_error() {
    let remote = ScriptedRemote::new(Script::Fail("connection refused".to_string()));
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, Some(remote.clone()));

    let response = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0",
                "method": "tools/call",
                "params": {"name": "generate_recipe", "arguments": {"prompt": "x"}},
                "id": "call-9"
            })))
            .await,
    );

    assert_eq!(remote.calls(), 1);
    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::INTERNAL_ERROR);
    assert!(error.message.contains("connection refused"));
    // 失败也必须回携原请求 ID
    assert_eq!(response.id, RequestId::Str("call-9".to_string()));
}

#[tokio::test]
async fn test_remote_error_envelope_passes_through_unmodified() {
    // 远程自己返回的结构化错误（含域专属错误码）原样透传
    let remote = ScriptedRemote::new(Script::Respond(json!({
        "jsonrpc": "2.0",
        "error": {"code": -32050, "message": "recipe quota exceeded", "data": {"retryAfter": 60}},
        "id": 3
    })));
    let dispatcher = Dispatcher::new(ForwardMode::Hybrid, Some(remote));

    let response = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0", "method": "tools/call", "params": {"name": "x"}, "id": 3
            })))
            .await,
    );

    let error = response.error.unwrap();
    assert_eq!(error.code, -32050);
    assert_eq!(error.message, "recipe quota exceeded");
    assert_eq!(error.data.unwrap()["retryAfter"], 60);
}

#[tokio::test]
async fn test_remote_no_content_suppresses_reply() {
    let remote = ScriptedRemote::new(Script::NoContent);
    let dispatcher = Dispatcher::new(ForwardMode::Proxy, Some(remote.clone()));

    let outcome = dispatcher
        .dispatch(request(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized"
        })))
        .await;

    assert_eq!(remote.calls(), 1);
    assert!(matches!(outcome, Outcome::NoReply));
}

#[tokio::test]
async fn test_proxy_mode_forwards_everything() {
    // proxy 模式下 initialize 也不在本地应答，由远程决定一切
    let remote = ScriptedRemote::new(Script::Respond(json!({
        "jsonrpc": "2.0",
        "result": {"protocolVersion": "2024-11-05", "serverInfo": {"name": "remote", "version": "9"}},
        "id": 1
    })));
    let dispatcher = Dispatcher::new(ForwardMode::Proxy, Some(remote.clone()));

    for method in ["initialize", "tools/list", "tools/call", "foo/bar"] {
        let _ = dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0", "method": method, "id": 1
            })))
            .await;
    }

    assert_eq!(remote.calls(), 4);

    let response = expect_reply(
        dispatcher
            .dispatch(request(json!({
                "jsonrpc": "2.0", "method": "initialize", "id": 1
            })))
            .await,
    );
    // 远程身份原样透传，不被本地身份覆盖
    assert_eq!(response.result.unwrap()["serverInfo"]["name"], "remote");
}

#[tokio::test]
async fn test_unordered_completion_is_tolerated() {
    // 设计上没有按到达顺序排队回复：每行是独立任务，后到的请求若远程
    // 先返回就先完成。这里固定住这个行为——若要严格按序回复，必须显式
    // 引入每连接 FIFO 队列，而不是依赖调度巧合。
    let remote = ScriptedRemote::new(Script::DelayedEcho);
    let dispatcher = Arc::new(Dispatcher::new(ForwardMode::Hybrid, Some(remote)));
    let completion_order = Arc::new(Mutex::new(Vec::new()));

    let slow = {
        let dispatcher = Arc::clone(&dispatcher);
        let order = Arc::clone(&completion_order);
        tokio::spawn(async move {
            let _ = dispatcher
                .dispatch(request(json!({
                    "jsonrpc": "2.0", "method": "tools/call",
                    "params": {"name": "generate_recipe", "delay_ms": 80}, "id": 1
                })))
                .await;
            order.lock().unwrap().push(1);
        })
    };
    let fast = {
        let dispatcher = Arc::clone(&dispatcher);
        let order = Arc::clone(&completion_order);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let _ = dispatcher
                .dispatch(request(json!({
                    "jsonrpc": "2.0", "method": "tools/call",
                    "params": {"name": "generate_recipe", "delay_ms": 5}, "id": 2
                })))
                .await;
            order.lock().unwrap().push(2);
        })
    };

    slow.await.unwrap();
    fast.await.unwrap();

    assert_eq!(*completion_order.lock().unwrap(), vec![2, 1]);
}
