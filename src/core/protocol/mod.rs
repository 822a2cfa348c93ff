// src/core/protocol/mod.rs

pub mod action;
pub mod request;

pub use action::{
    ActionDescriptor, ActionError, ActionLinks, ActionParameter, ActionPostResponse,
    ActionResponse, ActionRule, ActionsManifest, CompletedAction, LinkedAction, NextActionLink,
    ParameterType, PostResponseLinks,
};
pub use request::{ActionPostRequest, MemoInput, NextActionPostRequest};
