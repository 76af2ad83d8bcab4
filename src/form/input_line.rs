use serde_json::Value;

use crate::domain::InputLineElement;

use super::{
    error::SetupError,
    state::{InputState, InputType},
    validator::{FieldSource, InputTest, InputValidator},
};

const VALUE_FIELD: &str = "value";

/// A single text field of the wizard page.
#[derive(Debug, Clone)]
pub struct InputLine {
    id: String,
    label: Option<String>,
    placeholder: Option<String>,
    value: String,
    validator: InputValidator,
}

impl InputLine {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            placeholder: None,
            value: String::new(),
            validator: InputValidator::new(),
        }
    }

    pub fn from_element(element: &InputLineElement) -> Result<Self, SetupError> {
        let mut validator = InputValidator::new();
        for spec in &element.tests {
            validator = validator.add_test(InputTest::from_spec(spec, VALUE_FIELD)?);
        }
        Ok(Self {
            id: element.id.clone(),
            label: element.label.clone(),
            placeholder: element.placeholder.clone(),
            value: element.value.clone(),
            validator,
        })
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }

    /// Store a typed value and quietly revalidate.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let Self {
            validator, value, ..
        } = self;
        validator.revalidate(&ValueField(value.as_str()));
    }

    pub fn validate(&mut self, side_effect: bool) -> bool {
        let Self {
            validator, value, ..
        } = self;
        validator.validate(&ValueField(value.as_str()), side_effect)
    }

    pub fn get_state(&self) -> InputState {
        InputState::new(
            self.id.clone(),
            InputType::InputLine,
            Value::String(self.value.clone()),
        )
    }

    /// Apply `state` when it is addressed to this line. Returns whether it was.
    pub fn from_state(&mut self, state: &InputState) -> Result<bool, SetupError> {
        if !state.targets(&self.id, InputType::InputLine) {
            return Ok(false);
        }
        match &state.data {
            Value::String(text) => self.value = text.clone(),
            Value::Null => self.value.clear(),
            other => {
                return Err(SetupError::malformed(
                    &self.id,
                    format!("expected a string, found {other}"),
                ));
            }
        }
        let Self {
            validator, value, ..
        } = self;
        validator.revalidate(&ValueField(value.as_str()));
        Ok(true)
    }
}

struct ValueField<'a>(&'a str);

impl FieldSource for ValueField<'_> {
    fn field_text(&self, field: &str) -> Option<&str> {
        (field == VALUE_FIELD).then_some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TestRuleSpec, TestSpec};
    use serde_json::json;

    fn class_name_line() -> InputLine {
        InputLine::from_element(&InputLineElement {
            id: "className".to_string(),
            label: Some("Class name".to_string()),
            placeholder: None,
            value: String::new(),
            tests: vec![
                TestSpec {
                    name: "empty".to_string(),
                    rule: TestRuleSpec::NotEmpty,
                    message: "Class name is required".to_string(),
                    priority: 30,
                },
                TestSpec {
                    name: "uppercase".to_string(),
                    rule: TestRuleSpec::Matches {
                        pattern: "^[A-Z]".to_string(),
                    },
                    message: "Class names start uppercase".to_string(),
                    priority: 15,
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn validates_declared_tests() {
        let mut line = class_name_line();
        assert!(!line.validate(true));
        assert_eq!(
            line.validator().notice().unwrap().message,
            "Class name is required"
        );
        line.set_value("Drivetrain");
        assert!(line.validator().notice().is_none());
        assert!(line.validate(true));
    }

    #[test]
    fn state_round_trip_and_mismatch() {
        let mut line = class_name_line();
        line.set_value("Arm");
        let state = line.get_state();
        assert_eq!(state.data, json!("Arm"));

        let mut other = class_name_line();
        assert!(other.from_state(&state).unwrap());
        assert_eq!(other.value(), "Arm");

        let foreign = InputState::new("other", InputType::InputLine, json!("x"));
        assert!(!other.from_state(&foreign).unwrap());
        let wrong_kind = InputState::new("className", InputType::ParameterSelector, json!([]));
        assert!(!other.from_state(&wrong_kind).unwrap());
        let malformed = InputState::new("className", InputType::InputLine, json!(4));
        assert!(other.from_state(&malformed).is_err());
        assert_eq!(other.value(), "Arm");
    }

    #[test]
    fn host_state_refreshes_visible_notice() {
        let mut line = class_name_line();
        assert!(!line.validate(true));
        let state = InputState::new("className", InputType::InputLine, json!("Elevator"));
        assert!(line.from_state(&state).unwrap());
        assert!(line.validator().notice().is_none());

        let mut quiet = class_name_line();
        let lower = InputState::new("className", InputType::InputLine, json!("elevator"));
        assert!(quiet.from_state(&lower).unwrap());
        assert!(quiet.validator().notice().is_none(), "no new notice is raised");
    }
}
