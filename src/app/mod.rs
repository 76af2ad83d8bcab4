mod context;
mod events;
mod options;

pub use context::WizardContext;
pub use events::WizardEvent;
pub use options::WizardOptions;
