use std::sync::Arc;

use serde_json::Value;

use crate::domain::TypeCatalog;

use super::{
    error::SetupError,
    parameter::{ParameterItem, ParameterKind, PropertyValue},
    state::{InputState, InputType},
};

/// Which edge of a row carries the drop marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Drop marker painted while a row is dragged. `row` indexes `parameters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropHighlight {
    pub row: usize,
    pub edge: Edge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub active: usize,
    pub x: f64,
    pub y: f64,
    pub target: Option<usize>,
}

/// Ordered, reorderable list of typed parameters bound to one page element.
#[derive(Debug, Clone)]
pub struct ParameterSelector {
    id: String,
    label: Option<String>,
    kind: ParameterKind,
    catalog: Arc<TypeCatalog>,
    include_primitives: bool,
    row_height: f64,
    parameters: Vec<ParameterItem>,
    row_tops: Vec<f64>,
    rendered_rows: usize,
    highlight: Option<DropHighlight>,
    drag: Option<DragSession>,
    generation: u64,
}

pub const DEFAULT_ROW_HEIGHT: f64 = 64.0;

impl ParameterSelector {
    pub fn new(id: impl Into<String>, kind: ParameterKind, catalog: Arc<TypeCatalog>) -> Self {
        let mut selector = Self {
            id: id.into(),
            label: None,
            kind,
            catalog,
            include_primitives: false,
            row_height: DEFAULT_ROW_HEIGHT,
            parameters: Vec::new(),
            row_tops: Vec::new(),
            rendered_rows: 0,
            highlight: None,
            drag: None,
            generation: 0,
        };
        selector.refresh();
        selector
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_primitives(mut self, include: bool) -> Self {
        self.include_primitives = include;
        self
    }

    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self.refresh();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn include_primitives(&self) -> bool {
        self.include_primitives
    }

    pub fn parameters(&self) -> &[ParameterItem] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn highlight(&self) -> Option<DropHighlight> {
        self.highlight
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn row_tops(&self) -> &[f64] {
        &self.row_tops
    }

    pub fn rendered_rows(&self) -> usize {
        self.rendered_rows
    }

    /// Bumped on every refresh; views compare it to drop stale row handles.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resync everything derived from the list: row count, default geometry,
    /// drop marker. Rows are quietly revalidated.
    pub fn refresh(&mut self) {
        self.rendered_rows = self.parameters.len();
        self.row_tops = (0..self.rendered_rows)
            .map(|index| index as f64 * self.row_height)
            .collect();
        self.highlight = None;
        self.generation += 1;
        for parameter in &mut self.parameters {
            parameter.validate(false);
        }
    }

    /// Replace the default geometry with measured row offsets.
    pub fn set_row_tops(&mut self, tops: Vec<f64>) -> bool {
        if tops.len() != self.rendered_rows {
            tracing::warn!(
                selector = %self.id,
                expected = self.rendered_rows,
                got = tops.len(),
                "ignoring stale row layout"
            );
            return false;
        }
        self.row_tops = tops;
        true
    }

    pub fn add_parameter(&mut self) -> Result<usize, SetupError> {
        let item = ParameterItem::new(self.kind, &self.catalog)?;
        self.parameters.push(item);
        self.refresh();
        Ok(self.parameters.len() - 1)
    }

    pub fn remove_param(&mut self, index: usize) -> bool {
        if index >= self.parameters.len() {
            return false;
        }
        self.parameters.remove(index);
        self.drag = match self.drag.take() {
            Some(session) if session.active == index => None,
            Some(mut session) => {
                if session.active > index {
                    session.active -= 1;
                }
                session.target = None;
                Some(session)
            }
            None => None,
        };
        self.refresh();
        true
    }

    /// Change a row's type. Descriptors outside the offered catalog are refused.
    pub fn set_type(&mut self, index: usize, descriptor: &str) -> bool {
        if !self.catalog.contains(descriptor, self.include_primitives) {
            return false;
        }
        match self.parameters.get_mut(index) {
            Some(parameter) => {
                parameter.set_type(descriptor);
                true
            }
            None => false,
        }
    }

    pub fn set_property(&mut self, index: usize, id: &str, value: PropertyValue) -> bool {
        self.parameters
            .get_mut(index)
            .is_some_and(|parameter| parameter.set_property(id, value))
    }

    /// Validate every row, surfacing each row's notice even after a failure.
    pub fn validate(&mut self) -> bool {
        self.parameters
            .iter_mut()
            .fold(true, |valid, parameter| parameter.validate(true) && valid)
    }

    /// Where the row `active` would land if dropped at `cursor_y`.
    ///
    /// The returned index addresses the list with `active` already removed.
    /// The marker is moved to the row just before that insertion point.
    pub fn on_drag(&mut self, cursor_y: f64, active: usize) -> Option<usize> {
        self.highlight = None;
        if active >= self.parameters.len() || self.row_tops.len() != self.parameters.len() {
            return None;
        }
        let candidates = self
            .row_tops
            .iter()
            .copied()
            .enumerate()
            .filter(|(row, _)| *row != active)
            .collect::<Vec<_>>();
        let last = candidates.len().checked_sub(1)?;

        for (i, &(row, top)) in candidates.iter().enumerate() {
            let hit = if i == 0 && cursor_y < top {
                Some((0, Edge::Top))
            } else if i == last && cursor_y > top {
                Some((i + 1, Edge::Bottom))
            } else if cursor_y > top
                && candidates
                    .get(i + 1)
                    .is_some_and(|&(_, next)| cursor_y < next)
            {
                Some((i + 1, Edge::Bottom))
            } else {
                None
            };
            if let Some((target, edge)) = hit {
                self.highlight = Some(DropHighlight { row, edge });
                return Some(target);
            }
        }
        None
    }

    /// Move the row `active` to where [`Self::on_drag`] places it. A drop that
    /// crosses no boundary leaves the order unchanged. Returns the row's new index.
    pub fn on_drop(&mut self, cursor_y: f64, active: usize) -> Option<usize> {
        let target = self.on_drag(cursor_y, active);
        let moved = target.map(|position| {
            let item = self.parameters.remove(active);
            let position = position.min(self.parameters.len());
            self.parameters.insert(position, item);
            position
        });
        self.refresh();
        moved
    }

    pub fn begin_drag(&mut self, index: usize, x: f64, y: f64) -> bool {
        if index >= self.parameters.len() {
            return false;
        }
        self.drag = Some(DragSession {
            active: index,
            x,
            y,
            target: None,
        });
        true
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> Option<usize> {
        let active = self.drag.as_ref()?.active;
        let target = self.on_drag(y, active);
        if let Some(session) = self.drag.as_mut() {
            session.x = x;
            session.y = y;
            session.target = target;
        }
        target
    }

    pub fn end_drag(&mut self, y: f64) -> Option<usize> {
        let session = self.drag.take()?;
        self.on_drop(y, session.active)
    }

    pub fn get_state(&self) -> InputState {
        InputState::new(
            self.id.clone(),
            InputType::ParameterSelector,
            Value::Array(self.parameters.iter().map(ParameterItem::get_state).collect()),
        )
    }

    /// Replace the whole list from `state` when it is addressed to this
    /// selector. Nothing changes unless every entry decodes.
    pub fn from_state(&mut self, state: &InputState) -> Result<bool, SetupError> {
        if !state.targets(&self.id, InputType::ParameterSelector) {
            return Ok(false);
        }
        let entries = match &state.data {
            Value::Array(entries) => entries.as_slice(),
            Value::Null => &[],
            other => {
                return Err(SetupError::malformed(
                    &self.id,
                    format!("expected an array, found {other}"),
                ));
            }
        };
        let parameters = entries
            .iter()
            .map(|data| ParameterItem::restore(self.kind, &self.catalog, &self.id, data))
            .collect::<Result<Vec<_>, _>>()?;
        self.parameters = parameters;
        self.drag = None;
        self.refresh();
        Ok(true)
    }
}
