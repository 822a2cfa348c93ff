// src/core/protocol/request.rs

//! Request bodies POSTed by action clients.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reads an optional field, treating a value of the wrong JSON type as absent.
///
/// Field-level problems then surface as the validation error of that field
/// rather than as an unreadable body.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Form values collected by the client for the memo action.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoInput {
    #[serde(default, deserialize_with = "lenient")]
    pub memo: Option<String>,
}

/// The body of a transaction-building POST.
///
/// Clients send the collected input under `data`; some older clients send it under
/// `params`. Both are accepted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPostRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data: Option<MemoInput>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub params: Option<MemoInput>,
}

impl ActionPostRequest {
    /// Returns the first non-empty memo, looking at `params` before `data`.
    pub fn memo(&self) -> Option<&str> {
        [self.params.as_ref(), self.data.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|input| input.memo.as_deref())
            .find(|memo| !memo.is_empty())
    }
}

/// The callback POSTed to a `links.next` href once the client's transaction landed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NextActionPostRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub signature: Option<String>,
}
