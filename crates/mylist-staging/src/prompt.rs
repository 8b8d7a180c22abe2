//! Prompt documents for a staging session

use mylist_entries::{Category, Status};
use mylist_listing::{DisplayDocument, FormField, SelectOption, Widget};

use crate::item::SessionKind;
use crate::session::StagingSession;

pub mod widget_ids {
    pub const NEW_ENTRY: &str = "new_entry";
    pub const FINALIZE: &str = "finalize";
    pub const BULK: &str = "bulk";
    pub const COMMIT: &str = "commit";
    pub const CANCEL: &str = "cancel";
    pub const CATEGORY_MENU: &str = "category";
    pub const STATUS_MENU: &str = "status";
    pub const TITLE_FORM: &str = "title";
    pub const LINES_FORM: &str = "lines";
}

impl StagingSession {
    /// Current queue, draft and line errors, with the widgets that drive the next step.
    ///
    /// Public so others can follow along; only the owner can act on it.
    pub fn prompt(&self) -> DisplayDocument {
        let mut text = format!(
            "**{}** ({} queued)\n",
            capitalize_kind(self.kind),
            self.queued().len()
        );
        for (index, mutation) in self.queued().iter().enumerate() {
            text.push_str(&format!("{}. {}\n", index + 1, mutation.describe()));
        }

        if let Some(draft) = self.draft() {
            text.push_str(&format!(
                "Draft: title={}, category={}, status={}\n",
                draft.title.as_deref().unwrap_or("?"),
                draft.category.map(|c| c.as_str()).unwrap_or("?"),
                draft.status.map(|s| s.as_str()).unwrap_or("?"),
            ));
        }

        if !self.line_errors().is_empty() {
            text.push_str("Rejected lines:\n");
            for line in self.line_errors() {
                text.push_str(&format!("- line {} `{}`: {}\n", line.line_no, line.raw, line.reason));
            }
        }

        let mut doc = DisplayDocument::public(text).with_session(self.id.clone());

        if self.kind == SessionKind::AddBatch {
            if self.draft().is_some() {
                doc = doc
                    .with_widget(title_form())
                    .with_widget(category_menu())
                    .with_widget(status_menu())
                    .button(widget_ids::FINALIZE, "Add to batch");
            } else {
                doc = doc.button(widget_ids::NEW_ENTRY, "New entry");
            }
        }

        doc.button(widget_ids::BULK, "Paste lines")
            .button(widget_ids::COMMIT, "Commit")
            .button(widget_ids::CANCEL, "Cancel")
    }

    /// Multi-line form for bulk text, one entry per line.
    pub fn bulk_form(&self) -> DisplayDocument {
        DisplayDocument::owner_only(format!(
            "One entry per line: `{}`",
            self.kind.line_format()
        ))
        .with_session(self.id.clone())
        .with_widget(Widget::Form {
            id: widget_ids::LINES_FORM.to_string(),
            title: capitalize_kind(self.kind),
            fields: vec![FormField {
                id: widget_ids::LINES_FORM.to_string(),
                label: self.kind.line_format().to_string(),
                multiline: true,
            }],
        })
    }
}

fn capitalize_kind(kind: SessionKind) -> String {
    let name = kind.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_form() -> Widget {
    Widget::Form {
        id: widget_ids::TITLE_FORM.to_string(),
        title: "Title".to_string(),
        fields: vec![FormField {
            id: widget_ids::TITLE_FORM.to_string(),
            label: "Title".to_string(),
            multiline: false,
        }],
    }
}

fn category_menu() -> Widget {
    Widget::Menu {
        id: widget_ids::CATEGORY_MENU.to_string(),
        placeholder: "Category".to_string(),
        options: Category::ALL
            .iter()
            .map(|c| SelectOption {
                value: c.as_str().to_string(),
                label: c.label(),
            })
            .collect(),
    }
}

fn status_menu() -> Widget {
    Widget::Menu {
        id: widget_ids::STATUS_MENU.to_string(),
        placeholder: "Status".to_string(),
        options: Status::ALL
            .iter()
            .map(|s| SelectOption {
                value: s.as_str().to_string(),
                label: s.label(),
            })
            .collect(),
    }
}
