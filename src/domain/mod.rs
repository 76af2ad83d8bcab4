mod catalog;
mod config;
mod page;

pub use catalog::{CatalogSet, PRIMITIVES_GROUP, TypeCatalog, TypeEntry, UNGROUPED};
pub use config::{BotbuilderConfig, HardwareType, HardwareTypes, config_schema, load_config};
pub use page::{InputLineElement, PageElement, PageLayout, SelectorElement, TestSpec, TestRuleSpec};
