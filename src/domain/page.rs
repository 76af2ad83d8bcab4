use serde::{Deserialize, Serialize};

use super::catalog::CatalogSet;

/// Description of a wizard page: the form elements in document order plus
/// the type catalogs the page's selectors draw from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub catalogs: CatalogSet,
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum PageElement {
    #[serde(rename = "inputLine")]
    InputLine(InputLineElement),
    #[serde(rename = "parameterSelector")]
    ParameterSelector(SelectorElement),
}

impl PageElement {
    pub fn id(&self) -> &str {
        match self {
            PageElement::InputLine(element) => &element.id,
            PageElement::ParameterSelector(element) => &element.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputLineElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorElement {
    pub id: String,
    /// Parameter class the selector instantiates, e.g. `HardwareParameter`.
    pub param_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Overrides the wizard-wide primitives default for this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_primitives: Option<bool>,
}

/// Declarative validator test attached to an input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    pub name: String,
    #[serde(flatten)]
    pub rule: TestRuleSpec,
    pub message: String,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum TestRuleSpec {
    NotEmpty,
    Matches { pattern: String },
    Rejects { pattern: String },
}

impl PageLayout {
    pub fn input_lines(&self) -> impl Iterator<Item = &InputLineElement> {
        self.elements.iter().filter_map(|element| match element {
            PageElement::InputLine(line) => Some(line),
            PageElement::ParameterSelector(_) => None,
        })
    }

    pub fn selectors(&self) -> impl Iterator<Item = &SelectorElement> {
        self.elements.iter().filter_map(|element| match element {
            PageElement::ParameterSelector(selector) => Some(selector),
            PageElement::InputLine(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_elements_in_document_order() {
        let page: PageLayout = serde_json::from_value(json!({
            "title": "New Subsystem",
            "catalogs": {
                "hardwareTypes": {"Sensors": [{"descriptor": "Enc", "name": "Encoder"}]}
            },
            "elements": [
                {"class": "parameterSelector", "id": "hardware", "paramClass": "HardwareParameter"},
                {
                    "class": "inputLine",
                    "id": "className",
                    "tests": [
                        {"name": "empty", "rule": "notEmpty", "message": "Required", "priority": 30},
                        {"name": "chars", "rule": "matches", "pattern": "^[A-Za-z0-9]*$", "message": "Bad"}
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(page.elements[0].id(), "hardware");
        let line = page.input_lines().next().unwrap();
        assert_eq!(line.tests.len(), 2);
        assert_eq!(line.tests[0].rule, TestRuleSpec::NotEmpty);
        assert_eq!(line.tests[1].priority, 0);
        let selector = page.selectors().next().unwrap();
        assert_eq!(selector.param_class, "HardwareParameter");
        assert_eq!(selector.include_primitives, None);
        assert!(page.catalogs.subsystems.is_empty());
    }
}
