use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::bridge::{AutosaveScheduler, HostBridge, HostMessage, Inbound};
use crate::domain::{PageElement, PageLayout, TypeCatalog};
use crate::form::{
    InputLine, InputState, InputType, ParameterKind, ParameterSelector, SetupError,
};
use crate::presentation::{ElementView, PageView, render_page};

use super::{events::WizardEvent, options::WizardOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Input(usize),
    Selector(usize),
}

/// Every form component on one wizard page plus the channel to its host.
pub struct WizardContext<B: HostBridge> {
    title: Option<String>,
    inputs: Vec<InputLine>,
    selectors: Vec<ParameterSelector>,
    order: Vec<Slot>,
    bridge: B,
    options: WizardOptions,
    autosave: AutosaveScheduler,
}

impl<B: HostBridge> WizardContext<B> {
    /// Instantiate one component per page element, in document order.
    pub fn from_page(
        page: &PageLayout,
        bridge: B,
        options: WizardOptions,
    ) -> Result<Self, SetupError> {
        let shared = |kind: ParameterKind| Arc::new(kind.catalog(&page.catalogs).clone());
        let hardware = shared(ParameterKind::Hardware);
        let subsystems = shared(ParameterKind::Subsystem);
        let catalog_for = |kind: ParameterKind| -> Arc<TypeCatalog> {
            match kind {
                ParameterKind::Hardware => Arc::clone(&hardware),
                ParameterKind::Subsystem => Arc::clone(&subsystems),
            }
        };

        let mut inputs = Vec::new();
        let mut selectors = Vec::new();
        let mut order = Vec::with_capacity(page.elements.len());
        for element in &page.elements {
            match element {
                PageElement::InputLine(line) => {
                    order.push(Slot::Input(inputs.len()));
                    inputs.push(InputLine::from_element(line)?);
                }
                PageElement::ParameterSelector(spec) => {
                    let kind = ParameterKind::from_class_name(&spec.param_class)?;
                    let include_primitives =
                        spec.include_primitives.unwrap_or(options.include_primitives);
                    let selector = ParameterSelector::new(spec.id.clone(), kind, catalog_for(kind))
                        .with_label(spec.label.clone())
                        .with_primitives(include_primitives)
                        .with_row_height(options.row_height);
                    order.push(Slot::Selector(selectors.len()));
                    selectors.push(selector);
                }
            }
        }
        debug!(
            inputs = inputs.len(),
            selectors = selectors.len(),
            "wizard page ready"
        );

        Ok(Self {
            title: page.title.clone(),
            inputs,
            selectors,
            order,
            bridge,
            autosave: AutosaveScheduler::new(options.autosave_delay),
            options,
        })
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn inputs(&self) -> &[InputLine] {
        &self.inputs
    }

    pub fn selectors(&self) -> &[ParameterSelector] {
        &self.selectors
    }

    /// First input line with element id `id`.
    pub fn input(&self, id: &str) -> Option<&InputLine> {
        self.inputs.iter().find(|line| line.id() == id)
    }

    pub fn input_mut(&mut self, id: &str) -> Option<&mut InputLine> {
        self.inputs.iter_mut().find(|line| line.id() == id)
    }

    /// First selector with element id `id`.
    pub fn selector(&self, id: &str) -> Option<&ParameterSelector> {
        self.selectors.iter().find(|selector| selector.id() == id)
    }

    pub fn selector_mut(&mut self, id: &str) -> Option<&mut ParameterSelector> {
        self.selectors.iter_mut().find(|selector| selector.id() == id)
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn into_bridge(self) -> B {
        self.bridge
    }

    pub fn pending_autosaves(&self) -> usize {
        self.autosave.pending()
    }

    pub fn next_autosave(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    /// Validate every component so each one shows its notice.
    pub fn validate(&mut self) -> bool {
        let inputs_ok = self
            .inputs
            .iter_mut()
            .fold(true, |valid, line| line.validate(true) && valid);
        let selectors_ok = self
            .selectors
            .iter_mut()
            .fold(true, |valid, selector| selector.validate() && valid);
        inputs_ok && selectors_ok
    }

    /// Input-line states followed by selector states.
    pub fn get_data(&self) -> Vec<InputState> {
        self.inputs
            .iter()
            .map(InputLine::get_state)
            .chain(self.selectors.iter().map(ParameterSelector::get_state))
            .collect()
    }

    /// States keyed by element id. A repeated id keeps the later component.
    pub fn get_named_data(&self) -> IndexMap<String, InputState> {
        let mut named = IndexMap::new();
        for state in self.get_data() {
            named.insert(state.id.clone(), state);
        }
        named
    }

    pub fn send_message(&mut self, message: &HostMessage) -> Result<()> {
        trace!(id = %message.id, "posting host message");
        self.bridge.post_message(message)
    }

    /// Post the full current snapshot as an `update`.
    pub fn save_state(&mut self) -> Result<()> {
        let message =
            HostMessage::update(&self.get_data()).context("failed to serialize wizard state")?;
        self.send_message(&message)
    }

    /// React to a host message. Returns how many state entries were applied.
    pub fn handle_message(&mut self, message: &HostMessage) -> usize {
        match message.classify() {
            Inbound::SetState(entries) => self.apply_state(&entries),
            Inbound::Unknown(id) => {
                debug!(%id, "ignoring host message");
                0
            }
        }
    }

    /// Hand each entry to the first component with the same id and type.
    /// Entries nothing claims are dropped; malformed ones are skipped.
    pub fn apply_state(&mut self, entries: &[Value]) -> usize {
        let mut applied = 0;
        for entry in entries {
            let state = match InputState::deserialize(entry) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "skipping malformed state entry");
                    continue;
                }
            };
            debug!(id = %state.id, data_type = ?state.data_type, "applying host state");
            let outcome = match state.data_type {
                InputType::InputLine => self
                    .input_mut(&state.id)
                    .map(|line| line.from_state(&state)),
                InputType::ParameterSelector => self
                    .selector_mut(&state.id)
                    .map(|selector| selector.from_state(&state)),
            };
            match outcome {
                Some(Ok(true)) => applied += 1,
                Some(Ok(false)) | None => {
                    debug!(id = %state.id, "no component claims state entry");
                }
                Some(Err(err)) => warn!(error = %err, "skipping malformed state entry"),
            }
        }
        applied
    }

    /// Run one user event to completion. Returns whether it changed anything.
    pub fn dispatch(&mut self, event: WizardEvent, now: Instant) -> Result<bool> {
        match event {
            WizardEvent::KeyUp => {
                if self.options.autosave {
                    self.save_state()?;
                }
                Ok(false)
            }
            WizardEvent::MouseUp => {
                if self.options.autosave {
                    let deadline = self.autosave.schedule(now);
                    trace!(?deadline, "autosave scheduled");
                }
                Ok(false)
            }
            WizardEvent::Input { id, value } => match self.input_mut(&id) {
                Some(line) => {
                    line.set_value(value);
                    Ok(true)
                }
                None => {
                    warn!(%id, "input event for unknown element");
                    Ok(false)
                }
            },
            other => self.dispatch_to_selector(other),
        }
    }

    fn dispatch_to_selector(&mut self, event: WizardEvent) -> Result<bool> {
        let Some(id) = event.selector().map(str::to_string) else {
            return Ok(false);
        };
        let Some(selector) = self.selector_mut(&id) else {
            warn!(selector = %id, "event for unknown selector");
            return Ok(false);
        };
        let changed = match event {
            WizardEvent::AddParameter { .. } => {
                selector
                    .add_parameter()
                    .with_context(|| format!("cannot add a parameter to `{id}`"))?;
                true
            }
            WizardEvent::RemoveParameter { index, .. } => selector.remove_param(index),
            WizardEvent::SetType { index, value, .. } => {
                let changed = selector.set_type(index, &value);
                if !changed {
                    warn!(selector = %id, index, descriptor = %value, "type change rejected");
                }
                changed
            }
            WizardEvent::SetProperty {
                index,
                property,
                value,
                ..
            } => selector.set_property(index, &property, value),
            WizardEvent::DragStart { index, x, y, .. } => selector.begin_drag(index, x, y),
            WizardEvent::DragMove { x, y, .. } => selector.drag_to(x, y).is_some(),
            WizardEvent::DragEnd { y, .. } => selector.end_drag(y).is_some(),
            WizardEvent::RowLayout { tops, .. } => selector.set_row_tops(tops),
            WizardEvent::KeyUp | WizardEvent::MouseUp | WizardEvent::Input { .. } => false,
        };
        Ok(changed)
    }

    /// Post one snapshot per deferred save that is due at `now`.
    pub fn poll_autosave(&mut self, now: Instant) -> Result<usize> {
        let due = self.autosave.take_due(now);
        for _ in 0..due {
            self.save_state()?;
        }
        Ok(due)
    }

    /// Post every deferred save immediately.
    pub fn flush_autosave(&mut self) -> Result<usize> {
        let due = self.autosave.take_all();
        for _ in 0..due {
            self.save_state()?;
        }
        Ok(due)
    }

    pub fn render(&self) -> String {
        let elements = self
            .order
            .iter()
            .map(|slot| match *slot {
                Slot::Input(index) => ElementView::InputLine(&self.inputs[index]),
                Slot::Selector(index) => ElementView::Selector(&self.selectors[index]),
            })
            .collect();
        render_page(&PageView {
            title: self.title.as_deref(),
            elements,
        })
    }
}
