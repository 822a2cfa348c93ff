// src/core/actions/descriptor.rs

use super::ACTION_PATH;
use crate::core::protocol::{
    ActionDescriptor, ActionLinks, ActionParameter, ActionResponse, ActionRule, ActionsManifest,
    LinkedAction, ParameterType,
};

const TITLE: &str = "Send Alice a Message";
const ICON: &str = "https://ucarecdn.com/7aa46c85-08a4-4bc7-9376-88ec48bb1f43/-/preview/880x864/-/quality/smart/-/format/auto/";
const DESCRIPTION: &str = "Send Alice a message on-chain using a Memo, redirects to xyz";

/// The descriptor served on GET: one linked action with a single `memo` textarea.
pub fn memo_action() -> ActionResponse {
    ActionResponse::Action(ActionDescriptor {
        title: TITLE.to_string(),
        icon: ICON.to_string(),
        description: DESCRIPTION.to_string(),
        label: "Send Message".to_string(),
        disabled: None,
        links: Some(ActionLinks {
            actions: vec![LinkedAction {
                href: ACTION_PATH.to_string(),
                label: "Send Memo".to_string(),
                parameters: vec![ActionParameter {
                    name: "memo".to_string(),
                    label: Some("Send a message on-chain using a Memo".to_string()),
                    kind: ParameterType::Textarea,
                    pattern_description: Some("Short message here".to_string()),
                    required: None,
                }],
            }],
        }),
    })
}

/// The `actions.json` rules mapping every action route onto itself.
pub fn actions_manifest() -> ActionsManifest {
    ActionsManifest {
        rules: vec![ActionRule {
            path_pattern: "/api/actions/**".to_string(),
            api_path: "/api/actions/**".to_string(),
        }],
    }
}
