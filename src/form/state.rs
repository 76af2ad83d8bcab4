use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which kind of component produced an [`InputState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    InputLine,
    ParameterSelector,
}

/// Serialized snapshot of one form component, keyed by its element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputState {
    pub id: String,
    pub data_type: InputType,
    pub data: Value,
}

impl InputState {
    pub fn new(id: impl Into<String>, data_type: InputType, data: Value) -> Self {
        Self {
            id: id.into(),
            data_type,
            data,
        }
    }

    /// True when this state is addressed to the component `id` of kind `data_type`.
    pub fn targets(&self, id: &str, data_type: InputType) -> bool {
        self.data_type == data_type && self.id == id
    }
}
