mod autosave;
mod host;
mod message;

pub use autosave::{AutosaveScheduler, DEFAULT_AUTOSAVE_DELAY};
pub use host::{HostBridge, JsonLinesBridge, RecordingBridge};
pub use message::{HostMessage, Inbound, SET_STATE, UPDATE};
