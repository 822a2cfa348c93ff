// src/core/protocol/action.rs

//! Response payloads of the Solana Actions protocol.

use serde::{Deserialize, Serialize};

/// Describes an action a client can render and execute (`type: "action"`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    pub title: String,
    pub icon: String,
    pub description: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
}

/// The set of executable actions offered by an `ActionDescriptor`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

/// One button/form of an action, pointing at the route that builds its transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkedAction {
    pub href: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

/// A user input collected by the client before POSTing to a `LinkedAction`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterType {
    #[default]
    Text,
    Email,
    Url,
    Number,
    Date,
    DatetimeLocal,
    Textarea,
}

/// The terminal node of an action chain. Carries no further links.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletedAction {
    pub title: String,
    pub icon: String,
    pub label: String,
    pub description: String,
}

/// A renderable action payload: either a further action or the end of a chain.
///
/// Serialized with the protocol's `type` discriminator, so an `Action` renders as
/// `{"type":"action",...}` and a `Completed` as `{"type":"completed",...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionResponse {
    Action(ActionDescriptor),
    Completed(CompletedAction),
}

/// Where a client goes after the transaction returned by a POST is confirmed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NextActionLink {
    /// The client POSTs `{account, signature}` to `href` to fetch the next action.
    Post { href: String },
    /// The next action is embedded directly.
    Inline { action: ActionResponse },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostResponseLinks {
    pub next: NextActionLink,
}

/// The body returned by a transaction-building POST.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename = "transaction")]
pub struct ActionPostResponse {
    /// Base64 encoded, unsigned, serialized transaction.
    pub transaction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PostResponseLinks>,
}

/// The uniform failure body for every route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single path mapping rule of `actions.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}

/// The `actions.json` document served from the site root.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionsManifest {
    pub rules: Vec<ActionRule>,
}
