//! 工具描述与 `tools/call` 结果格式。

use serde_json::{Value, json};

use crate::favicon::{DeliveryReport, FaviconCommandError, SVG_TO_FAVICON_TOOL};

/// `tools/list` 返回的工具定义。
pub fn tool_definitions() -> Value {
    json!({
        "tools": [{
            "name": SVG_TO_FAVICON_TOOL,
            "description": "Converts SVG icons into various standard website favicon formats such as ICO and PNG.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "svg_data": {
                        "type": "string",
                        "description": "SVG icon content provided as a string."
                    },
                    "svg_file": {
                        "type": "string",
                        "description": "Path to the SVG file to convert."
                    },
                    "output_dir": {
                        "type": "string",
                        "description": "Directory to save the output files. If not provided, returns base64 encoded data."
                    },
                    "output_formats": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "An array of strings specifying the desired output formats."
                    }
                }
            }
        }]
    })
}

/// 成功结果：文本 + `_meta` 结构化数据。
pub fn tool_success(report: DeliveryReport) -> Value {
    json!({
        "content": [{ "type": "text", "text": report.text }],
        "_meta": Value::Object(report.meta),
    })
}

/// 工具执行失败：以 `isError` 结果返回，而非协议级错误。
pub fn tool_failure(error: &FaviconCommandError) -> Value {
    json!({
        "content": [{ "type": "text", "text": error.message }],
        "isError": true,
        "_meta": {
            "code": error.code,
            "stage": error.stage,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favicon::FaviconError;
    use serde_json::Map;

    #[test]
    fn definition_lists_the_single_tool() {
        let definitions = tool_definitions();
        let tools = definitions["tools"].as_array().expect("tools should be an array");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], SVG_TO_FAVICON_TOOL);
        assert!(tools[0]["inputSchema"]["properties"]["output_formats"].is_object());
    }

    #[test]
    fn failure_result_is_flagged() {
        let error = FaviconCommandError::from(FaviconError::MissingInput("x".to_string()));
        let value = tool_failure(&error);
        assert_eq!(value["isError"], true);
        assert_eq!(value["_meta"]["code"], "missing_input");
    }

    #[test]
    fn success_result_carries_meta() {
        let mut meta = Map::new();
        meta.insert("ico".to_string(), Value::String("AAA=".to_string()));
        let value = tool_success(DeliveryReport {
            text: "ok".to_string(),
            meta,
        });
        assert_eq!(value["content"][0]["text"], "ok");
        assert_eq!(value["_meta"]["ico"], "AAA=");
        assert!(value.get("isError").is_none());
    }
}
