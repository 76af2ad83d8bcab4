use std::fmt;

/// Failure while building form components from a page description or state.
#[derive(Debug, Clone)]
pub enum SetupError {
    /// The catalog handed to a parameter has no entries to default to.
    EmptyCatalog { kind: &'static str },
    /// A selector names a parameter class the factory does not know.
    UnknownParameterClass(String),
    /// A validator test carries a pattern that does not compile.
    InvalidPattern { test: String, message: String },
    /// A state payload does not have the shape its component expects.
    MalformedState { id: String, message: String },
}

impl SetupError {
    pub(crate) fn malformed(id: &str, message: impl fmt::Display) -> Self {
        SetupError::MalformedState {
            id: id.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::EmptyCatalog { kind } => {
                write!(f, "no types available for {kind}")
            }
            SetupError::UnknownParameterClass(name) => {
                write!(f, "unknown parameter class `{name}`")
            }
            SetupError::InvalidPattern { test, message } => {
                write!(f, "test `{test}` has an invalid pattern: {message}")
            }
            SetupError::MalformedState { id, message } => {
                write!(f, "{id}: malformed state: {message}")
            }
        }
    }
}

impl std::error::Error for SetupError {}
