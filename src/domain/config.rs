use anyhow::{Context, Result, bail};
use jsonschema::validator_for;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::{TypeCatalog, TypeEntry};

/// Contents of a project's botbuilder configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Botbuilder config schema")]
pub struct BotbuilderConfig {
    /// Folder for generated subsystems, relative to the source folder.
    /// `{BASE_PACKAGE}` expands to the package holding `Main.java`.
    pub subsystem_package: String,
    /// Folder for generated commands, relative to the source folder.
    pub command_package: String,
    /// Folder for generated instant commands.
    pub instant_command_package: String,
    /// Folder for generated autonomous commands.
    pub auto_command_package: String,
    /// Folder for generated autonomous instant commands.
    pub instant_auto_command_package: String,
    /// Class that generated subsystems and commands hang off.
    pub base_class_name: String,
    /// Source folder, relative to the workspace root.
    pub src_folder: String,
    /// Build output folder, relative to the workspace root.
    pub build_folder: String,
    /// Test source folder, relative to the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_folder: Option<String>,
    /// Hide the "FRCMocks not found" warning in wizards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppress_mocks_warning: Option<bool>,
    pub hardware: HardwareTypes,
}

/// Hardware classes offered to generated subsystems, by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HardwareTypes {
    pub motor_controllers: Vec<HardwareType>,
    pub pneumatics: Vec<HardwareType>,
    pub sensors: Vec<HardwareType>,
    pub other: Vec<HardwareType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HardwareType {
    /// Simple class name.
    pub name: String,
    /// Label shown in type dropdowns.
    pub pretty_name: String,
    /// Fully qualified class descriptor.
    pub descriptor: String,
    /// Descriptor of the mock wrapper used in tests.
    pub mock: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HardwareTypes {
    /// Build the hardware type catalog, one group per hardware category.
    pub fn catalog(&self) -> TypeCatalog {
        let group = |items: &[HardwareType]| {
            items
                .iter()
                .map(|item| TypeEntry::new(item.descriptor.clone(), item.pretty_name.clone()))
                .collect::<Vec<_>>()
        };
        TypeCatalog::new()
            .with_group("Motor Controllers", group(&self.motor_controllers))
            .with_group("Pneumatics", group(&self.pneumatics))
            .with_group("Sensors", group(&self.sensors))
            .with_group("Other", group(&self.other))
    }

    pub fn len(&self) -> usize {
        self.motor_controllers.len() + self.pneumatics.len() + self.sensors.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON Schema describing [`BotbuilderConfig`].
pub fn config_schema() -> Result<Value> {
    let schema = schemars::schema_for!(BotbuilderConfig);
    serde_json::to_value(&schema).context("failed to serialize configuration schema")
}

/// Validate a raw configuration document against [`config_schema`] and decode it.
///
/// Every schema violation is reported, prefixed with its instance path.
pub fn load_config(value: &Value) -> Result<BotbuilderConfig> {
    let schema = config_schema()?;
    let validator = validator_for(&schema).context("failed to compile configuration schema")?;
    let issues = validator
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect::<Vec<_>>();
    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "configuration failed validation");
        bail!("invalid configuration:\n{}", issues.join("\n"));
    }
    serde_json::from_value(value.clone()).context("failed to decode configuration")
}
