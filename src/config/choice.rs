use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use strum::{EnumMessage, IntoEnumIterator};

/// Contract for a tagged configuration enum (`{"type": ..., "params": ...}`).
pub trait ConfigChoice: Sized + Serialize + DeserializeOwned + JsonSchema {
    type Kind: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator;

    /// JSON Schema for the whole tagged enum.
    fn schema() -> Schema;

    /// Default `params` JSON for a given kind.
    fn default_params(kind: Self::Kind) -> serde_json::Result<Value>;

    /// Build the typed enum from kind + params.
    fn from_parts(kind: Self::Kind, params: Value) -> serde_json::Result<Self> {
        let key: &'static str = kind.into();
        serde_json::from_value(json!({ "type": key, "params": params }))
    }

    fn with_defaults(kind: Self::Kind) -> serde_json::Result<Self> {
        Self::from_parts(kind, Self::default_params(kind)?)
    }

    /// `(key, label, description)` for every kind.
    fn catalogue() -> Vec<(&'static str, &'static str, &'static str)> {
        Self::Kind::iter()
            .map(|k| {
                (
                    k.into(),
                    k.get_message().unwrap_or(""),
                    k.get_detailed_message().unwrap_or(""),
                )
            })
            .collect()
    }
}
