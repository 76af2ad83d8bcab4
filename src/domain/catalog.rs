use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::config::BotbuilderConfig;

/// Group name of the ungrouped, top-level section of a catalog.
pub const UNGROUPED: &str = "";

/// Group name used when the Java primitives are injected into a selector.
pub const PRIMITIVES_GROUP: &str = "Primitives";

const JAVA_PRIMITIVES: [(&str, &str); 9] = [
    ("B", "byte"),
    ("Z", "boolean"),
    ("C", "char"),
    ("S", "short"),
    ("I", "int"),
    ("F", "float"),
    ("L", "long"),
    ("D", "double"),
    ("java.lang.String", "String"),
];

/// A selectable type: the class descriptor and the label shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub descriptor: String,
    pub name: String,
}

impl TypeEntry {
    pub fn new(descriptor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            name: name.into(),
        }
    }
}

/// Grouped list of type descriptors offered by a parameter's type dropdown.
///
/// Groups keep their insertion order. The group named [`UNGROUPED`] is always
/// presented first, without an `<optgroup>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCatalog {
    groups: IndexMap<String, Vec<TypeEntry>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<String>, entries: Vec<TypeEntry>) -> Self {
        self.insert_group(group, entries);
        self
    }

    pub fn insert_group(&mut self, group: impl Into<String>, entries: Vec<TypeEntry>) {
        self.groups.insert(group.into(), entries);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// The Java primitive types plus `java.lang.String`.
    pub fn primitives() -> Vec<TypeEntry> {
        JAVA_PRIMITIVES
            .iter()
            .map(|(descriptor, name)| TypeEntry::new(*descriptor, *name))
            .collect()
    }

    /// Descriptor a freshly constructed parameter starts with.
    ///
    /// The ungrouped section wins when it has entries; otherwise the first
    /// non-empty group in insertion order is used.
    pub fn default_descriptor(&self) -> Option<&str> {
        if let Some(entry) = self.groups.get(UNGROUPED).and_then(|items| items.first()) {
            return Some(&entry.descriptor);
        }
        self.groups
            .values()
            .find_map(|items| items.first())
            .map(|entry| entry.descriptor.as_str())
    }

    /// Groups in presentation order. With `include_primitives` a stored
    /// Primitives group is replaced where it sits, otherwise appended.
    pub fn presented_groups(&self, include_primitives: bool) -> Vec<(&str, Vec<&TypeEntry>)> {
        let mut out = Vec::with_capacity(self.groups.len() + 1);
        if let Some(items) = self.groups.get(UNGROUPED) {
            out.push((UNGROUPED, items.iter().collect()));
        }
        for (group, items) in &self.groups {
            if group == UNGROUPED {
                continue;
            }
            if include_primitives && group == PRIMITIVES_GROUP {
                out.push((PRIMITIVES_GROUP, primitive_refs()));
                continue;
            }
            out.push((group.as_str(), items.iter().collect()));
        }
        if include_primitives && !self.groups.contains_key(PRIMITIVES_GROUP) {
            out.push((PRIMITIVES_GROUP, primitive_refs()));
        }
        out
    }

    pub fn contains(&self, descriptor: &str, include_primitives: bool) -> bool {
        let in_groups = self
            .groups
            .values()
            .flatten()
            .any(|entry| entry.descriptor == descriptor);
        in_groups
            || (include_primitives
                && JAVA_PRIMITIVES
                    .iter()
                    .any(|(primitive, _)| *primitive == descriptor))
    }

    /// Display name for a descriptor, if the catalog knows it.
    pub fn display_name(&self, descriptor: &str) -> Option<&str> {
        self.groups
            .values()
            .flatten()
            .find(|entry| entry.descriptor == descriptor)
            .map(|entry| entry.name.as_str())
            .or_else(|| {
                JAVA_PRIMITIVES
                    .iter()
                    .find(|(primitive, _)| *primitive == descriptor)
                    .map(|(_, name)| *name)
            })
    }
}

fn primitive_refs() -> Vec<&'static TypeEntry> {
    use std::sync::OnceLock;

    static PRIMITIVES: OnceLock<Vec<TypeEntry>> = OnceLock::new();
    PRIMITIVES.get_or_init(TypeCatalog::primitives).iter().collect()
}

/// The two catalogs a wizard page can draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSet {
    /// Types offered to hardware parameters.
    #[serde(default)]
    pub hardware_types: TypeCatalog,
    /// Subsystems offered to command parameters.
    #[serde(default)]
    pub subsystems: TypeCatalog,
}

impl CatalogSet {
    /// Hardware catalog derived from `config`; subsystems come from the host.
    pub fn from_config(config: &BotbuilderConfig, subsystems: TypeCatalog) -> Self {
        Self {
            hardware_types: config.hardware.catalog(),
            subsystems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motors() -> Vec<TypeEntry> {
        vec![
            TypeEntry::new("edu.wpi.first.wpilibj.Talon", "Talon"),
            TypeEntry::new("edu.wpi.first.wpilibj.Spark", "Spark"),
        ]
    }

    #[test]
    fn default_prefers_ungrouped_section() {
        let catalog = TypeCatalog::new()
            .with_group("Motor Controllers", motors())
            .with_group(UNGROUPED, vec![TypeEntry::new("Lfoo/Bar;", "Bar")]);
        assert_eq!(catalog.default_descriptor(), Some("Lfoo/Bar;"));
    }

    #[test]
    fn default_falls_back_to_first_group() {
        let catalog = TypeCatalog::new()
            .with_group(UNGROUPED, Vec::new())
            .with_group("Motor Controllers", motors());
        assert_eq!(
            catalog.default_descriptor(),
            Some("edu.wpi.first.wpilibj.Talon")
        );
        assert_eq!(TypeCatalog::new().default_descriptor(), None);
    }

    #[test]
    fn primitives_are_presented_last_without_mutating() {
        let catalog = TypeCatalog::new().with_group("Sensors", motors());
        let groups = catalog.presented_groups(true);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].0, PRIMITIVES_GROUP);
        assert_eq!(groups[1].1.len(), 9);
        assert_eq!(catalog.presented_groups(false).len(), 1);
        assert!(catalog.contains("I", true));
        assert!(!catalog.contains("I", false));
        assert_eq!(catalog.display_name("java.lang.String"), Some("String"));
    }

    #[test]
    fn deserializes_from_plain_mapping() {
        let catalog: TypeCatalog = serde_json::from_value(serde_json::json!({
            "": [{"descriptor": "A", "name": "a"}],
            "Group": [{"descriptor": "B", "name": "b"}]
        }))
        .unwrap();
        let groups = catalog.presented_groups(false);
        assert_eq!(groups[0].0, UNGROUPED);
        assert_eq!(groups[1].0, "Group");
    }

    #[test]
    fn stored_primitives_group_keeps_its_position() {
        let catalog = TypeCatalog::new()
            .with_group("Primitives", vec![TypeEntry::new("I", "integer")])
            .with_group("Sensors", motors());
        let groups = catalog.presented_groups(true);
        let names = groups.iter().map(|(name, _)| *name).collect::<Vec<_>>();
        assert_eq!(names, [PRIMITIVES_GROUP, "Sensors"]);
        assert_eq!(groups[0].1.len(), 9);

        let stored = catalog.presented_groups(false);
        assert_eq!(stored[0].1[0].name, "integer");
    }
}
