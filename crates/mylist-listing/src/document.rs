//! Rendered responses sent back through the interaction gateway

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the user who triggered the event sees the response
    OwnerOnly,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub label: String,
    pub multiline: bool,
}

/// Interactive component attached to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Button {
        id: String,
        label: String,
    },
    Menu {
        id: String,
        placeholder: String,
        options: Vec<SelectOption>,
    },
    Form {
        id: String,
        title: String,
        fields: Vec<FormField>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDocument {
    pub text: String,
    pub widgets: Vec<Widget>,
    pub visibility: Visibility,
    /// Correlates follow-up widget events with a staging session
    pub session_ref: Option<String>,
}

impl DisplayDocument {
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            widgets: Vec::new(),
            visibility: Visibility::Public,
            session_ref: None,
        }
    }

    pub fn owner_only(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::OwnerOnly,
            ..Self::public(text)
        }
    }

    pub fn with_session(mut self, session_ref: impl Into<String>) -> Self {
        self.session_ref = Some(session_ref.into());
        self
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn button(mut self, id: &str, label: &str) -> Self {
        self.widgets.push(Widget::Button {
            id: id.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn has_widget(&self, id: &str) -> bool {
        self.widgets.iter().any(|w| match w {
            Widget::Button { id: wid, .. }
            | Widget::Menu { id: wid, .. }
            | Widget::Form { id: wid, .. } => wid == id,
        })
    }
}
