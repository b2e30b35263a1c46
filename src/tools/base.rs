use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 工具输入参数的 JSON Schema 定义
///
/// 序列化形态与线上协议一致（`{"type": "object", ...}`）。
/// 这里只是声明式元数据，参数校验由实际执行工具的一方负责，
/// 分发器不做校验。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    Object(SchemaObject),
    String(SchemaString),
    Number(SchemaNumber),
    Array(SchemaArray),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaString {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 最小长度（字符数）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// 最大长度（字符数）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaNumber {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaArray {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Box<Schema>,
}

/// 工具描述符：名称、人类可读描述与输入 Schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Schema,
}
