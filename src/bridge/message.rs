use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::InputState;

/// Inbound id: the host replaces the page state.
pub const SET_STATE: &str = "setState";
/// Outbound id: the page reports a full state snapshot.
pub const UPDATE: &str = "update";

/// Envelope exchanged with the host in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostMessage {
    pub id: String,
    #[serde(default)]
    pub payload: Value,
}

/// Inbound messages the wizard understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Raw state entries, decoded one by one so a bad entry cannot sink the rest.
    SetState(Vec<Value>),
    Unknown(String),
}

impl HostMessage {
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    pub fn update(states: &[InputState]) -> serde_json::Result<Self> {
        Ok(Self::new(UPDATE, serde_json::to_value(states)?))
    }

    pub fn set_state(states: &[InputState]) -> serde_json::Result<Self> {
        Ok(Self::new(SET_STATE, serde_json::to_value(states)?))
    }

    pub fn classify(&self) -> Inbound {
        if self.id != SET_STATE {
            return Inbound::Unknown(self.id.clone());
        }
        match &self.payload {
            Value::Array(entries) => Inbound::SetState(entries.clone()),
            Value::Null => Inbound::SetState(Vec::new()),
            other => Inbound::SetState(vec![other.clone()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::InputType;
    use serde_json::json;

    #[test]
    fn update_carries_full_snapshot() {
        let states = vec![
            InputState::new("name", InputType::InputLine, json!("Arm")),
            InputState::new("params", InputType::ParameterSelector, json!([])),
        ];
        let message = HostMessage::update(&states).unwrap();
        assert_eq!(message.id, UPDATE);
        assert_eq!(message.payload[1]["dataType"], json!("PARAMETER_SELECTOR"));
    }

    #[test]
    fn classifies_inbound_ids() {
        let message: HostMessage =
            serde_json::from_value(json!({"id": "setState", "payload": [{"id": "a"}]})).unwrap();
        assert_eq!(message.classify(), Inbound::SetState(vec![json!({"id": "a"})]));

        let message: HostMessage = serde_json::from_value(json!({"id": "ping"})).unwrap();
        assert_eq!(message.payload, Value::Null);
        assert_eq!(message.classify(), Inbound::Unknown("ping".to_string()));
    }
}
