//! Detailed-schema JSON for Plutus Data
//!
//! ```text
//! {"int": 42}
//! {"bytes": "abcd"}
//! {"list": [...]}
//! {"map": [{"k": ..., "v": ...}]}
//! {"constructor": 0, "fields": [...]}
//! ```
//!
//! Every object carries exactly one of the discriminator keys. JSON has no
//! notion of array framing, so decoded lists and constructors get the
//! canonical framing.

use super::PlutusData;
use crate::config::{CodecConfig, MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::error::{CoreError, CoreResult};
use num_bigint::BigInt;
use serde_json::{Map, Number, Value};

/// Keys that select a variant
pub const DISCRIMINATORS: [&str; 5] = ["int", "bytes", "list", "map", "constructor"];

impl PlutusData {
    /// Render in the detailed JSON schema
    pub fn to_json(&self) -> CoreResult<Value> {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || self.to_json_impl())
    }

    /// Implementation (called via stacker::maybe_grow)
    fn to_json_impl(&self) -> CoreResult<Value> {
        let mut object = Map::new();
        match self {
            PlutusData::Integer(n) => {
                // Exact digits; relies on serde_json's arbitrary_precision
                let number: Number = serde_json::from_str(&n.to_string())?;
                object.insert("int".into(), Value::Number(number));
            }
            PlutusData::ByteString(bytes) => {
                object.insert("bytes".into(), Value::String(hex::encode(bytes)));
            }
            PlutusData::List { items, .. } => {
                let items = items
                    .iter()
                    .map(PlutusData::to_json)
                    .collect::<CoreResult<Vec<_>>>()?;
                object.insert("list".into(), Value::Array(items));
            }
            PlutusData::Map(pairs) => {
                let mut entries = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let mut entry = Map::new();
                    entry.insert("k".into(), key.to_json()?);
                    entry.insert("v".into(), value.to_json()?);
                    entries.push(Value::Object(entry));
                }
                object.insert("map".into(), Value::Array(entries));
            }
            PlutusData::Constr { tag, fields, .. } => {
                let fields = fields
                    .iter()
                    .map(PlutusData::to_json)
                    .collect::<CoreResult<Vec<_>>>()?;
                object.insert("constructor".into(), Value::Number(Number::from(*tag)));
                object.insert("fields".into(), Value::Array(fields));
            }
        }
        Ok(Value::Object(object))
    }

    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    /// Parse a value in the detailed JSON schema
    pub fn from_json(value: &Value) -> CoreResult<Self> {
        Self::from_json_with_config(value, &CodecConfig::default())
    }

    pub fn from_json_with_config(value: &Value, config: &CodecConfig) -> CoreResult<Self> {
        JsonReader {
            max_depth: config.max_data_depth,
        }
        .data(value, 1)
    }

    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        Self::from_json_str_with_config(text, &CodecConfig::default())
    }

    pub fn from_json_str_with_config(text: &str, config: &CodecConfig) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_with_config(&value, config)
    }
}

struct JsonReader {
    max_depth: usize,
}

impl JsonReader {
    fn data(&self, value: &Value, depth: usize) -> CoreResult<PlutusData> {
        if depth > self.max_depth {
            return Err(CoreError::DepthLimit {
                limit: self.max_depth,
            });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.data_impl(value, depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn data_impl(&self, value: &Value, depth: usize) -> CoreResult<PlutusData> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid(format!("expected an object, got {value}")))?;

        let present: Vec<&str> = DISCRIMINATORS
            .iter()
            .copied()
            .filter(|key| object.contains_key(*key))
            .collect();
        let key = match present.as_slice() {
            [key] => *key,
            [] => return Err(invalid("object has no discriminator key")),
            keys => return Err(invalid(format!("object has several discriminator keys: {keys:?}"))),
        };

        match key {
            "int" => integer(&object["int"]).map(PlutusData::Integer),
            "bytes" => {
                let text = object["bytes"]
                    .as_str()
                    .ok_or_else(|| invalid("\"bytes\" must be a hex string"))?;
                Ok(PlutusData::ByteString(hex::decode(text)?))
            }
            "list" => {
                let items = self.array(&object["list"], "list", depth)?;
                Ok(PlutusData::list(items))
            }
            "map" => {
                let entries = object["map"]
                    .as_array()
                    .ok_or_else(|| invalid("\"map\" must be an array"))?;
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    let (key, value) = match (entry.get("k"), entry.get("v")) {
                        (Some(key), Some(value)) => (key, value),
                        _ => return Err(invalid("map entries need \"k\" and \"v\"")),
                    };
                    pairs.push((self.data(key, depth + 1)?, self.data(value, depth + 1)?));
                }
                Ok(PlutusData::Map(pairs))
            }
            _ => {
                let tag = object["constructor"]
                    .as_u64()
                    .ok_or_else(|| invalid("\"constructor\" must be a non-negative integer"))?;
                let fields = object
                    .get("fields")
                    .ok_or_else(|| invalid("constructor object needs \"fields\""))?;
                let fields = self.array(fields, "fields", depth)?;
                Ok(PlutusData::constr(tag, fields))
            }
        }
    }

    fn array(&self, value: &Value, key: &str, depth: usize) -> CoreResult<Vec<PlutusData>> {
        value
            .as_array()
            .ok_or_else(|| invalid(format!("\"{key}\" must be an array")))?
            .iter()
            .map(|item| self.data(item, depth + 1))
            .collect()
    }
}

fn integer(value: &Value) -> CoreResult<BigInt> {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse::<BigInt>()
            .map_err(|_| invalid(format!("\"int\" must be an integer, got {n}"))),
        other => Err(invalid(format!("\"int\" must be a number, got {other}"))),
    }
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::InvalidJson(reason.into())
}
