use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{CatalogSet, TypeCatalog};

use super::{
    error::SetupError,
    validator::{FieldSource, InputTest, InputValidator, Notice},
};

const NAME_EMPTY: &str = "Variable name cannot be empty";
const NAME_CHARS: &str = "Variable name can only contain alphanumeric characters";
const NAME_LOWERCASE: &str = "Variable name should start with a lowercase";
const DOC_ESCAPE: &str = "Javadoc cannot contain sequence \"*/\"";

/// The kinds of parameter row a selector can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// A named hardware component passed to a subsystem constructor.
    Hardware,
    /// A subsystem passed to a command constructor, optionally required.
    Subsystem,
}

const FACTORY: [(&str, ParameterKind); 2] = [
    ("HardwareParameter", ParameterKind::Hardware),
    ("SubsystemParameter", ParameterKind::Subsystem),
];

impl ParameterKind {
    /// Resolve the parameter class named by a selector element.
    pub fn from_class_name(name: &str) -> Result<Self, SetupError> {
        FACTORY
            .iter()
            .find(|(class, _)| *class == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| SetupError::UnknownParameterClass(name.to_string()))
    }

    pub fn class_name(self) -> &'static str {
        match self {
            ParameterKind::Hardware => "HardwareParameter",
            ParameterKind::Subsystem => "SubsystemParameter",
        }
    }

    /// The catalog this kind draws its types from.
    pub fn catalog(self, catalogs: &CatalogSet) -> &TypeCatalog {
        match self {
            ParameterKind::Hardware => &catalogs.hardware_types,
            ParameterKind::Subsystem => &catalogs.subsystems,
        }
    }

    fn validator(self) -> Result<InputValidator, SetupError> {
        let validator = InputValidator::new()
            .add_test(InputTest::not_empty("empty", "name", NAME_EMPTY, 30))
            .add_test(InputTest::matching(
                "namechars",
                "name",
                NAME_CHARS,
                25,
                "^[A-Za-z0-9]*$",
            )?)
            .add_test(InputTest::matching(
                "lowercase",
                "name",
                NAME_LOWERCASE,
                15,
                "^[a-z]|^$",
            )?);
        match self {
            ParameterKind::Hardware => Ok(validator.add_test(InputTest::rejecting(
                "docescape",
                "doc",
                DOC_ESCAPE,
                25,
                r"\*/",
            )?)),
            ParameterKind::Subsystem => Ok(validator),
        }
    }
}

/// Raw value delivered by an input control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Checked(bool),
    Text(String),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Checked(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterFields {
    Hardware {
        name: String,
        doc: String,
    },
    Subsystem {
        name: String,
        required: bool,
        doc: String,
    },
}

impl ParameterFields {
    fn empty(kind: ParameterKind) -> Self {
        match kind {
            ParameterKind::Hardware => ParameterFields::Hardware {
                name: String::new(),
                doc: String::new(),
            },
            ParameterKind::Subsystem => ParameterFields::Subsystem {
                name: String::new(),
                required: false,
                doc: String::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParameterFields::Hardware { name, .. } | ParameterFields::Subsystem { name, .. } => {
                name
            }
        }
    }

    pub fn doc(&self) -> &str {
        match self {
            ParameterFields::Hardware { doc, .. } | ParameterFields::Subsystem { doc, .. } => doc,
        }
    }

    pub fn required(&self) -> Option<bool> {
        match self {
            ParameterFields::Hardware { .. } => None,
            ParameterFields::Subsystem { required, .. } => Some(*required),
        }
    }
}

impl FieldSource for ParameterFields {
    fn field_text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(self.name()),
            "doc" => Some(self.doc()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HardwareState {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    type_descriptor: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    doc: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubsystemState {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    type_descriptor: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    doc: String,
}

/// One row of a parameter selector.
#[derive(Debug, Clone)]
pub struct ParameterItem {
    kind: ParameterKind,
    type_descriptor: String,
    fields: ParameterFields,
    validator: InputValidator,
}

impl ParameterItem {
    /// Create an empty row whose type is the catalog's default descriptor.
    pub fn new(kind: ParameterKind, catalog: &TypeCatalog) -> Result<Self, SetupError> {
        let type_descriptor = catalog
            .default_descriptor()
            .ok_or(SetupError::EmptyCatalog {
                kind: kind.class_name(),
            })?
            .to_string();
        Ok(Self {
            kind,
            type_descriptor,
            fields: ParameterFields::empty(kind),
            validator: kind.validator()?,
        })
    }

    /// Rebuild a row from a state object on behalf of the component `owner`.
    ///
    /// Unlike [`ParameterItem::new`] this accepts an empty catalog as long as
    /// the state names its own type.
    pub fn restore(
        kind: ParameterKind,
        catalog: &TypeCatalog,
        owner: &str,
        data: &Value,
    ) -> Result<Self, SetupError> {
        let mut item = Self {
            kind,
            type_descriptor: catalog.default_descriptor().unwrap_or_default().to_string(),
            fields: ParameterFields::empty(kind),
            validator: kind.validator()?,
        };
        item.from_state(data)
            .map_err(|err| SetupError::malformed(owner, err))?;
        if item.type_descriptor.is_empty() {
            return Err(SetupError::EmptyCatalog {
                kind: kind.class_name(),
            });
        }
        Ok(item)
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn type_descriptor(&self) -> &str {
        &self.type_descriptor
    }

    pub fn fields(&self) -> &ParameterFields {
        &self.fields
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.validator.notice()
    }

    pub(crate) fn set_type(&mut self, descriptor: impl Into<String>) {
        self.type_descriptor = descriptor.into();
    }

    /// Update one input of the row. Unknown ids and mismatched values are ignored.
    pub fn set_property(&mut self, id: &str, value: PropertyValue) -> bool {
        let changed = match (&mut self.fields, id, value) {
            (
                ParameterFields::Hardware { name, .. } | ParameterFields::Subsystem { name, .. },
                "name",
                PropertyValue::Text(text),
            ) => {
                *name = text;
                true
            }
            (
                ParameterFields::Hardware { doc, .. } | ParameterFields::Subsystem { doc, .. },
                "doc",
                PropertyValue::Text(text),
            ) => {
                *doc = text;
                true
            }
            (ParameterFields::Subsystem { required, .. }, "required", PropertyValue::Checked(flag)) => {
                *required = flag;
                true
            }
            _ => false,
        };
        if changed {
            self.validator.revalidate(&self.fields);
        }
        changed
    }

    pub fn validate(&mut self, side_effect: bool) -> bool {
        self.validator.validate(&self.fields, side_effect)
    }

    pub fn get_state(&self) -> Value {
        let state = match &self.fields {
            ParameterFields::Hardware { name, doc } => serde_json::to_value(HardwareState {
                type_descriptor: Some(self.type_descriptor.clone()),
                name: name.clone(),
                doc: doc.clone(),
            }),
            ParameterFields::Subsystem {
                name,
                required,
                doc,
            } => serde_json::to_value(SubsystemState {
                type_descriptor: Some(self.type_descriptor.clone()),
                name: name.clone(),
                required: *required,
                doc: doc.clone(),
            }),
        };
        state.unwrap_or(Value::Null)
    }

    /// Overwrite the row from a plain state object. Missing fields fall back
    /// to empty values; a missing type keeps the current descriptor.
    pub fn from_state(&mut self, data: &Value) -> Result<(), serde_json::Error> {
        let descriptor = match self.kind {
            ParameterKind::Hardware => {
                let state = HardwareState::deserialize(data)?;
                self.fields = ParameterFields::Hardware {
                    name: state.name,
                    doc: state.doc,
                };
                state.type_descriptor
            }
            ParameterKind::Subsystem => {
                let state = SubsystemState::deserialize(data)?;
                self.fields = ParameterFields::Subsystem {
                    name: state.name,
                    required: state.required,
                    doc: state.doc,
                };
                state.type_descriptor
            }
        };
        if let Some(descriptor) = descriptor {
            self.type_descriptor = descriptor;
        }
        Ok(())
    }
}
