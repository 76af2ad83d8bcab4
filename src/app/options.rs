use std::time::Duration;

use crate::bridge::DEFAULT_AUTOSAVE_DELAY;
use crate::form::DEFAULT_ROW_HEIGHT;

#[derive(Debug, Clone)]
pub struct WizardOptions {
    /// Delay between a pointer release and the save it schedules.
    pub autosave_delay: Duration,
    /// Height assumed for each parameter row until a measured layout arrives.
    pub row_height: f64,
    /// Whether selectors offer Java primitives unless their element says otherwise.
    pub include_primitives: bool,
    /// Post `update` snapshots on key and pointer releases.
    pub autosave: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            row_height: DEFAULT_ROW_HEIGHT,
            include_primitives: false,
            autosave: true,
        }
    }
}

impl WizardOptions {
    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    pub fn with_primitives(mut self, include: bool) -> Self {
        self.include_primitives = include;
        self
    }

    pub fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }
}
