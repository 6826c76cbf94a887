use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "models": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" },
                    "binary": { "type": "string", "minLength": 1 },
                    "multiclass": { "type": "string", "minLength": 1 }
                },
                "additionalProperties": false
            },
            "analysis": {
                "type": "object",
                "properties": {
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "max_concurrency": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            },
            "tools": {
                "type": "array",
                "items": { "$ref": "#/$defs/tool" }
            }
        },
        "additionalProperties": false,
        "$defs": {
            "tool": {
                "type": "object",
                "required": ["name", "program"],
                "properties": {
                    "name": { "type": "string", "pattern": "^[A-Za-z0-9_-]+$" },
                    "program": { "type": "string", "minLength": 1 },
                    "args": { "type": "array", "items": { "type": "string" } },
                    "format": { "type": "string", "enum": ["normalized"] },
                    "success_exit_codes": { "type": "array", "items": { "type": "integer" } }
                },
                "additionalProperties": false
            }
        }
    })
});
