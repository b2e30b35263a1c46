//! 行帧编解码：一行文本对应一个 JSON-RPC 封包。
//!
//! 纯函数，无副作用。解码失败只发生在行不是合法 JSON 或缺少
//! `method` 字段时；未知方法属于分发阶段的问题，这里照常解码。

use super::{Request, Response};
use crate::errors::CodecError;

/// 解析一行输入为请求封包
pub fn decode(line: &str) -> Result<Request, CodecError> {
    serde_json::from_str::<Request>(line.trim_end_matches(&['\r', '\n'][..]))
        .map_err(CodecError::Decode)
}

/// 将响应封包序列化为单行输出（不含换行符）
///
/// 对任意嵌套的 `result`/`error.data` 负载无损。
pub fn encode(response: &Response) -> Result<String, CodecError> {
    serde_json::to_string(response).map_err(CodecError::Encode)
}
