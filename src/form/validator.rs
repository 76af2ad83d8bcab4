use regex::Regex;

use crate::domain::{TestRuleSpec, TestSpec};

use super::error::SetupError;

/// Anything a validator can read named text fields from.
pub trait FieldSource {
    fn field_text(&self, field: &str) -> Option<&str>;
}

#[derive(Debug, Clone)]
pub enum TestRule {
    NotEmpty,
    /// Passes when the pattern matches the field.
    Matches(Regex),
    /// Passes when the pattern does not occur anywhere in the field.
    Rejects(Regex),
}

#[derive(Debug, Clone)]
pub struct InputTest {
    name: String,
    field: String,
    rule: TestRule,
    message: String,
    priority: i32,
}

impl InputTest {
    pub fn not_empty(
        name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            rule: TestRule::NotEmpty,
            message: message.into(),
            priority,
        }
    }

    pub fn matching(
        name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
        priority: i32,
        pattern: &str,
    ) -> Result<Self, SetupError> {
        let name = name.into();
        let regex = compile(&name, pattern)?;
        Ok(Self {
            name,
            field: field.into(),
            rule: TestRule::Matches(regex),
            message: message.into(),
            priority,
        })
    }

    pub fn rejecting(
        name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
        priority: i32,
        pattern: &str,
    ) -> Result<Self, SetupError> {
        let name = name.into();
        let regex = compile(&name, pattern)?;
        Ok(Self {
            name,
            field: field.into(),
            rule: TestRule::Rejects(regex),
            message: message.into(),
            priority,
        })
    }

    /// Build a test from its page declaration, reading `field`.
    pub fn from_spec(spec: &TestSpec, field: &str) -> Result<Self, SetupError> {
        match &spec.rule {
            TestRuleSpec::NotEmpty => Ok(Self::not_empty(
                spec.name.clone(),
                field,
                spec.message.clone(),
                spec.priority,
            )),
            TestRuleSpec::Matches { pattern } => Self::matching(
                spec.name.clone(),
                field,
                spec.message.clone(),
                spec.priority,
                pattern,
            ),
            TestRuleSpec::Rejects { pattern } => Self::rejecting(
                spec.name.clone(),
                field,
                spec.message.clone(),
                spec.priority,
                pattern,
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// A missing field reads as empty text.
    pub fn passes(&self, source: &dyn FieldSource) -> bool {
        let text = source.field_text(&self.field).unwrap_or_default();
        match &self.rule {
            TestRule::NotEmpty => !text.is_empty(),
            TestRule::Matches(regex) => regex.is_match(text),
            TestRule::Rejects(regex) => !regex.is_match(text),
        }
    }
}

fn compile(test: &str, pattern: &str) -> Result<Regex, SetupError> {
    Regex::new(pattern).map_err(|err| SetupError::InvalidPattern {
        test: test.to_string(),
        message: err.to_string(),
    })
}

/// Message currently shown next to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub test: String,
    pub message: String,
}

/// Ordered chain of named tests guarding one form field or row.
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    tests: Vec<InputTest>,
    notice: Option<Notice>,
}

impl InputValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test; a test with the same name is replaced in place.
    pub fn add_test(mut self, test: InputTest) -> Self {
        match self.tests.iter_mut().find(|existing| existing.name == test.name) {
            Some(existing) => *existing = test,
            None => self.tests.push(test),
        }
        self
    }

    pub fn tests(&self) -> &[InputTest] {
        &self.tests
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Run every test in chain order.
    ///
    /// With `side_effect` the visible notice becomes the highest-priority
    /// failure (earliest in the chain on ties) or is cleared when all pass.
    pub fn validate(&mut self, source: &dyn FieldSource, side_effect: bool) -> bool {
        let worst = self.worst_failure(source);
        let valid = worst.is_none();
        if side_effect {
            self.notice = worst;
        }
        valid
    }

    /// Validate while the user is typing: an already visible notice is kept
    /// up to date, but no new notice is raised.
    pub fn revalidate(&mut self, source: &dyn FieldSource) -> bool {
        let showing = self.notice.is_some();
        self.validate(source, showing)
    }

    fn worst_failure(&self, source: &dyn FieldSource) -> Option<Notice> {
        let mut worst: Option<&InputTest> = None;
        for test in &self.tests {
            if test.passes(source) {
                continue;
            }
            if worst.is_none_or(|current| test.priority > current.priority) {
                worst = Some(test);
            }
        }
        worst.map(|test| Notice {
            test: test.name.clone(),
            message: test.message.clone(),
        })
    }
}
