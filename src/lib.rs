#![deny(rust_2018_idioms)]

mod app;
mod bridge;
mod domain;
mod form;
mod io;
mod presentation;

pub use app::{WizardContext, WizardEvent, WizardOptions};
pub use bridge::{
    AutosaveScheduler, DEFAULT_AUTOSAVE_DELAY, HostBridge, HostMessage, Inbound, JsonLinesBridge,
    RecordingBridge, SET_STATE, UPDATE,
};
pub use domain::{
    BotbuilderConfig, CatalogSet, HardwareType, HardwareTypes, InputLineElement, PRIMITIVES_GROUP,
    PageElement, PageLayout, SelectorElement, TestRuleSpec, TestSpec, TypeCatalog, TypeEntry,
    UNGROUPED, config_schema, load_config,
};
pub use form::{
    DEFAULT_ROW_HEIGHT, DragSession, DropHighlight, Edge, FieldSource, InputLine, InputState,
    InputTest, InputType, InputValidator, Notice, ParameterFields, ParameterItem, ParameterKind,
    ParameterSelector, PropertyValue, SetupError, TestRule,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, page_from_value, parse_config_str,
    parse_document_str, parse_page_str, serialize_value,
};
pub use presentation::{
    ElementView, PageView, render_input_line, render_page, render_parameter_row, render_selector,
    render_type_selector,
};

pub mod prelude {
    pub use super::{
        HostBridge, HostMessage, PageLayout, RecordingBridge, WizardContext, WizardEvent,
        WizardOptions,
    };
}
