//! 内置菜谱工具目录。
//!
//! 目录是静态的：进程启动时构造一次，顺序固定，运行期不变。
//! 工具的实际执行都在远程端点，这里只声明元数据。

use std::collections::BTreeMap;

use super::base::{Schema, SchemaArray, SchemaNumber, SchemaObject, SchemaString, ToolDescriptor};

/// 返回内置工具目录（顺序固定：generate_recipe、transform_recipe）
pub fn recipe_catalog() -> Vec<ToolDescriptor> {
    vec![generate_recipe(), transform_recipe()]
}

fn string_array(description: &str) -> Schema {
    Schema::Array(SchemaArray {
        description: Some(description.to_string()),
        items: Box::new(Schema::String(SchemaString::default())),
    })
}

fn generate_recipe() -> ToolDescriptor {
    ToolDescriptor {
        name: "generate_recipe".to_string(),
        description: "Generate a new recipe based on natural language instructions".to_string(),
        input_schema: Schema::Object(SchemaObject {
            description: None,
            properties: BTreeMap::from([
                (
                    "prompt".to_string(),
                    Schema::String(SchemaString {
                        description: Some(
                            "Natural language description of the desired recipe".to_string(),
                        ),
                        min_length: Some(1),
                        max_length: Some(1000),
                    }),
                ),
                (
                    "dietaryRestrictions".to_string(),
                    string_array("Dietary restrictions"),
                ),
                ("allergies".to_string(), string_array("Ingredients to avoid")),
                (
                    "calories".to_string(),
                    Schema::String(SchemaString {
                        description: Some("Target calories per serving".to_string()),
                        ..Default::default()
                    }),
                ),
                (
                    "protein".to_string(),
                    Schema::String(SchemaString {
                        description: Some("Target protein in grams".to_string()),
                        ..Default::default()
                    }),
                ),
                (
                    "servings".to_string(),
                    Schema::Number(SchemaNumber {
                        description: Some("Number of servings (1-20)".to_string()),
                        minimum: Some(1),
                        maximum: Some(20),
                        default: Some(4),
                    }),
                ),
            ]),
            required: vec!["prompt".to_string()],
        }),
    }
}

fn transform_recipe() -> ToolDescriptor {
    // 被转换的菜谱本身是一个嵌套对象，五个字段全部必填
    let recipe_schema = Schema::Object(SchemaObject {
        description: Some("The recipe to transform".to_string()),
        properties: BTreeMap::from([
            (
                "title".to_string(),
                Schema::String(SchemaString::default()),
            ),
            (
                "description".to_string(),
                Schema::String(SchemaString::default()),
            ),
            (
                "ingredients".to_string(),
                Schema::Array(SchemaArray {
                    description: None,
                    items: Box::new(Schema::String(SchemaString::default())),
                }),
            ),
            (
                "instructions".to_string(),
                Schema::Array(SchemaArray {
                    description: None,
                    items: Box::new(Schema::String(SchemaString::default())),
                }),
            ),
            (
                "servings".to_string(),
                Schema::Number(SchemaNumber::default()),
            ),
        ]),
        required: vec![
            "title".to_string(),
            "description".to_string(),
            "ingredients".to_string(),
            "instructions".to_string(),
            "servings".to_string(),
        ],
    });

    ToolDescriptor {
        name: "transform_recipe".to_string(),
        description: "Transform or modify an existing recipe".to_string(),
        input_schema: Schema::Object(SchemaObject {
            description: None,
            properties: BTreeMap::from([
                ("recipe".to_string(), recipe_schema),
                (
                    "instructions".to_string(),
                    Schema::String(SchemaString {
                        description: Some("How to transform the recipe".to_string()),
                        min_length: Some(1),
                        max_length: Some(1000),
                    }),
                ),
                (
                    "calories".to_string(),
                    Schema::String(SchemaString {
                        description: Some("New target calories".to_string()),
                        ..Default::default()
                    }),
                ),
                (
                    "protein".to_string(),
                    Schema::String(SchemaString {
                        description: Some("New target protein".to_string()),
                        ..Default::default()
                    }),
                ),
                (
                    "servings".to_string(),
                    Schema::Number(SchemaNumber {
                        description: Some("New servings".to_string()),
                        minimum: Some(1),
                        maximum: Some(20),
                        default: None,
                    }),
                ),
            ]),
            required: vec!["recipe".to_string(), "instructions".to_string()],
        }),
    }
}
