//! Structural contract for plan generation.
//!
//! The same tree is rendered into the dialect each backend understands:
//! plain JSON Schema for OpenAI-compatible APIs, and the OpenAPI subset
//! Gemini accepts as `responseSchema`.

use crate::domain::entities::{MealSlot, Weekday};
use serde_json::{Map, Value, json};

/// Provider-neutral schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String {
        description: Option<String>,
    },
    Array {
        items: Box<SchemaNode>,
        description: Option<String>,
    },
    /// Properties keep insertion order; `required` names a subset of them.
    /// Extra properties are never allowed.
    Object {
        properties: Vec<(String, SchemaNode)>,
        required: Vec<String>,
    },
}

impl SchemaNode {
    fn string(description: Option<&str>) -> Self {
        SchemaNode::String {
            description: description.map(str::to_string),
        }
    }

    /// Standard JSON Schema (lowercase types, `additionalProperties: false`).
    pub fn to_json_schema(&self) -> Value {
        match self {
            SchemaNode::String { description } => with_description(json!({"type": "string"}), description),
            SchemaNode::Array { items, description } => with_description(
                json!({"type": "array", "items": items.to_json_schema()}),
                description,
            ),
            SchemaNode::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_json_schema()))
                    .collect();
                json!({
                    "type": "object",
                    "properties": props,
                    "required": required,
                    "additionalProperties": false,
                })
            }
        }
    }

    /// Gemini `responseSchema` (uppercase types, `propertyOrdering`).
    pub fn to_gemini_schema(&self) -> Value {
        match self {
            SchemaNode::String { description } => with_description(json!({"type": "STRING"}), description),
            SchemaNode::Array { items, description } => with_description(
                json!({"type": "ARRAY", "items": items.to_gemini_schema()}),
                description,
            ),
            SchemaNode::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_gemini_schema()))
                    .collect();
                let ordering: Vec<&str> = properties.iter().map(|(n, _)| n.as_str()).collect();
                json!({
                    "type": "OBJECT",
                    "properties": props,
                    "required": required,
                    "propertyOrdering": ordering,
                })
            }
        }
    }

    /// Property names of an object node, in order. Empty for other nodes.
    pub fn property_names(&self) -> Vec<&str> {
        match self {
            SchemaNode::Object { properties, .. } => {
                properties.iter().map(|(n, _)| n.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { properties, .. } => properties
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    pub fn required(&self) -> &[String] {
        match self {
            SchemaNode::Object { required, .. } => required,
            _ => &[],
        }
    }
}

fn with_description(mut value: Value, description: &Option<String>) -> Value {
    if let (Some(desc), Some(obj)) = (description, value.as_object_mut()) {
        obj.insert("description".to_string(), Value::String(desc.clone()));
    }
    value
}

/// Schema for one meal: `dish` and `ingredients` required, `instructions` optional.
pub fn meal_schema(household_size: u32) -> SchemaNode {
    SchemaNode::Object {
        properties: vec![
            ("dish".to_string(), SchemaNode::string(Some("The name of the dish."))),
            (
                "ingredients".to_string(),
                SchemaNode::Array {
                    items: Box::new(SchemaNode::string(None)),
                    description: Some(format!(
                        "List of ingredients with quantities suitable for {} people.",
                        household_size
                    )),
                },
            ),
            (
                "instructions".to_string(),
                SchemaNode::string(Some("Short cooking instructions, a few sentences.")),
            ),
        ],
        required: vec!["dish".to_string(), "ingredients".to_string()],
    }
}

/// Schema for a full week: each of the seven days exactly once, all required,
/// each day requiring both meal slots.
pub fn plan_schema(household_size: u32) -> SchemaNode {
    let meal = meal_schema(household_size);
    let day = SchemaNode::Object {
        properties: MealSlot::ALL
            .iter()
            .map(|slot| (slot.as_str().to_string(), meal.clone()))
            .collect(),
        required: MealSlot::ALL.iter().map(|s| s.as_str().to_string()).collect(),
    };
    SchemaNode::Object {
        properties: Weekday::ALL
            .iter()
            .map(|d| (d.as_str().to_string(), day.clone()))
            .collect(),
        required: Weekday::ALL.iter().map(|d| d.as_str().to_string()).collect(),
    }
}
