//! Events delivered by the interaction gateway

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    SlashCommand {
        name: String,
        owner: String,
        #[serde(default)]
        args: HashMap<String, String>,
    },
    ButtonPress {
        session_ref: String,
        owner: String,
        button_id: String,
    },
    MenuSelect {
        session_ref: String,
        owner: String,
        menu_id: String,
        values: Vec<String>,
    },
    FormSubmit {
        session_ref: String,
        owner: String,
        fields: HashMap<String, String>,
    },
}

impl InboundEvent {
    /// Identity of the user who triggered the event
    pub fn owner(&self) -> &str {
        match self {
            InboundEvent::SlashCommand { owner, .. }
            | InboundEvent::ButtonPress { owner, .. }
            | InboundEvent::MenuSelect { owner, .. }
            | InboundEvent::FormSubmit { owner, .. } => owner,
        }
    }

    pub fn command(name: &str, owner: &str, args: &[(&str, &str)]) -> Self {
        InboundEvent::SlashCommand {
            name: name.to_string(),
            owner: owner.to_string(),
            args: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
