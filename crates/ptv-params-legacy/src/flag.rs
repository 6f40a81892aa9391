//! Serde helper for flags that older documents store as `0`/`1`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Float(f64),
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(b) => b,
        FlagRepr::Int(i) => i != 0,
        FlagRepr::Float(f) => f != 0.0,
    })
}
