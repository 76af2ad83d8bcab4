use serde::{Deserialize, Serialize};

use crate::form::PropertyValue;

/// User interaction delivered to the wizard, addressed by element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WizardEvent {
    KeyUp,
    MouseUp,
    /// New text for an input line.
    Input { id: String, value: String },
    AddParameter { selector: String },
    RemoveParameter { selector: String, index: usize },
    SetType {
        selector: String,
        index: usize,
        value: String,
    },
    SetProperty {
        selector: String,
        index: usize,
        property: String,
        value: PropertyValue,
    },
    DragStart {
        selector: String,
        index: usize,
        x: f64,
        y: f64,
    },
    DragMove { selector: String, x: f64, y: f64 },
    DragEnd { selector: String, y: f64 },
    /// Measured top offsets of the rendered rows.
    RowLayout { selector: String, tops: Vec<f64> },
}

impl WizardEvent {
    /// Selector the event is addressed to, if any.
    pub fn selector(&self) -> Option<&str> {
        match self {
            WizardEvent::AddParameter { selector }
            | WizardEvent::RemoveParameter { selector, .. }
            | WizardEvent::SetType { selector, .. }
            | WizardEvent::SetProperty { selector, .. }
            | WizardEvent::DragStart { selector, .. }
            | WizardEvent::DragMove { selector, .. }
            | WizardEvent::DragEnd { selector, .. }
            | WizardEvent::RowLayout { selector, .. } => Some(selector),
            WizardEvent::KeyUp | WizardEvent::MouseUp | WizardEvent::Input { .. } => None,
        }
    }
}
