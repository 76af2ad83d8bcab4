mod error;
mod input_line;
mod parameter;
mod selector;
mod state;
mod validator;

pub use error::SetupError;
pub use input_line::InputLine;
pub use parameter::{ParameterFields, ParameterItem, ParameterKind, PropertyValue};
pub use selector::{DEFAULT_ROW_HEIGHT, DragSession, DropHighlight, Edge, ParameterSelector};
pub use state::{InputState, InputType};
pub use validator::{FieldSource, InputTest, InputValidator, Notice, TestRule};
