//! Interactive viewing of a CellDL diagram.
//!
//! [`CellDLViewer`] owns the diagram being viewed and turns the host's
//! pointer input into object activation, selection, panning and zooming.
//! What happens is reported to listeners registered with
//! [`CellDLViewer::add_listener`].
//!
//! A diagram is loaded in two steps, with the host's render pass in between:
//! [`CellDLViewer::begin_loading`] attaches it and
//! [`CellDLViewer::finish_loading`] binds its objects.
//! [`CellDLViewer::view_diagram`] does both. Pointer input is ignored until
//! the diagram is interactive.

mod events;
mod panzoom;

pub use events::{
    Annotation, Annotations, EventComponent, EventListener, EventListeners, ViewerEvent,
    ViewerEventKind,
};
pub use panzoom::PanZoom;

use std::{fmt, path::Path};

use log::{debug, info, trace};

use celldl_core::{geometry::Point, identifier::Id};

use crate::{
    config::ViewerConfig,
    error::CellDLError,
    model::CellDLModel,
    objects::CellDLObject,
    surface::{RenderSurface, ShapeId},
};

/// Id of the host panel that holds the diagram.
const SVG_PANEL_ID: &str = "svg-panel";

/// The logical id of a rendered shape.
///
/// A shape's `data-parent-id` attribute names its object directly. A shape
/// with the `parent-id` class belongs to its parent's object. Any other
/// shape is named by its own `id`.
pub fn element_id(surface: &dyn RenderSurface, shape: ShapeId) -> Option<Id> {
    let id = match surface.attribute(shape, "data-parent-id") {
        Some(parent_id) => parent_id,
        None if surface.has_class(shape, "parent-id") => surface
            .parent(shape)
            .and_then(|parent| surface.attribute(parent, "id"))?,
        None => surface.attribute(shape, "id")?,
    };
    if id.is_empty() { None } else { Some(Id::new(&id)) }
}

/// Where the viewer is in loading a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NoDiagram,
    /// Attached and waiting for its objects to be bound.
    Loading,
    Interactive,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadState::NoDiagram => "no diagram",
            LoadState::Loading => "loading",
            LoadState::Interactive => "interactive",
        };
        f.write_str(name)
    }
}

/// The cursor the host should show over the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
}

/// A pointer event from the host.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    /// The shape under the pointer, if it is over the diagram's surface.
    pub target: Option<ShapeId>,
    /// Position in view coordinates.
    pub position: Point,
    /// Timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(target: Option<ShapeId>, position: Point, time_ms: u64) -> Self {
        Self {
            target,
            position,
            time_ms,
        }
    }
}

/// A tooltip being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    message: String,
    class: Option<String>,
}

impl Tooltip {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The CSS class styling the tooltip, `tooltip-<style>`.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}

/// An interactive view of one CellDL diagram at a time.
pub struct CellDLViewer {
    config: ViewerConfig,
    model: Option<CellDLModel>,
    state: LoadState,
    active: Option<Id>,
    selected: Option<Id>,
    panning: bool,
    pointer_moved: bool,
    pointer_down_time: u64,
    cursor: Cursor,
    tooltip: Option<Tooltip>,
    panzoom: PanZoom,
    listeners: EventListeners,
}

impl fmt::Debug for CellDLViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellDLViewer")
            .field("model", &self.model)
            .field("state", &self.state)
            .field("active", &self.active)
            .field("selected", &self.selected)
            .field("panzoom", &self.panzoom)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Default for CellDLViewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl CellDLViewer {
    pub fn new(config: ViewerConfig) -> Self {
        let panzoom = PanZoom::new(config.interaction());
        Self {
            config,
            model: None,
            state: LoadState::NoDiagram,
            active: None,
            selected: None,
            panning: false,
            pointer_moved: false,
            pointer_down_time: 0,
            cursor: Cursor::Default,
            tooltip: None,
            panzoom,
            listeners: EventListeners::default(),
        }
    }

    /// Creates a viewer configured from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::Config`] if the file is missing or invalid.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, CellDLError> {
        Ok(Self::new(ViewerConfig::load(path)?))
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn model(&self) -> Option<&CellDLModel> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut CellDLModel> {
        self.model.as_mut()
    }

    /// The object under the pointer.
    pub fn active_object(&self) -> Option<Id> {
        self.active
    }

    pub fn selected_object(&self) -> Option<Id> {
        self.selected
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn panzoom(&self) -> &PanZoom {
        &self.panzoom
    }

    /// Registers a callback for viewer events.
    pub fn add_listener(&mut self, listener: impl FnMut(&ViewerEvent) + 'static) {
        self.listeners.add(Box::new(listener));
    }

    pub fn remove_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Loads and shows a diagram, replacing any diagram being viewed.
    ///
    /// # Errors
    ///
    /// Fails if the diagram's objects can't be bound, in which case no
    /// diagram is left loaded.
    pub fn view_diagram(&mut self, model: CellDLModel) -> Result<(), CellDLError> {
        self.begin_loading(model)?;
        self.finish_loading()
    }

    /// Attaches a diagram, replacing any diagram being viewed.
    ///
    /// The diagram's objects will be measured with the viewer's style.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::LoadInProgress`] if another diagram is loading.
    pub fn begin_loading(&mut self, mut model: CellDLModel) -> Result<(), CellDLError> {
        self.close_diagram()?;
        model.set_style(self.config.style().clone());
        info!(uri = model.uri(); "Loading diagram");
        self.model = Some(model);
        self.state = LoadState::Loading;
        Ok(())
    }

    /// Binds the attached diagram's objects and makes it interactive.
    ///
    /// The surface gets one render tick first, so shapes are measured after
    /// the host has drawn them.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::NoDiagram`] if no diagram is loading, or the
    /// error that stopped its objects being bound.
    pub fn finish_loading(&mut self) -> Result<(), CellDLError> {
        if self.state != LoadState::Loading {
            return Err(CellDLError::NoDiagram);
        }
        let Some(mut model) = self.model.take() else {
            self.state = LoadState::NoDiagram;
            return Err(CellDLError::NoDiagram);
        };
        model.surface_mut().render_tick();
        if let Err(error) = model.finish_setup() {
            self.state = LoadState::NoDiagram;
            return Err(error);
        }

        self.active = None;
        self.selected = None;
        self.panning = false;
        self.pointer_moved = false;
        self.panzoom.enable();
        model.viewer_event(ViewerEventKind::Loaded, None);
        info!(uri = model.uri(); "Diagram is interactive");
        self.model = Some(model);
        self.state = LoadState::Interactive;
        self.apply_view_transform();
        self.dispatch_events();
        Ok(())
    }

    /// Closes the diagram being viewed and hands it back.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::LoadInProgress`] while a diagram is loading.
    pub fn close_diagram(&mut self) -> Result<Option<CellDLModel>, CellDLError> {
        match self.state {
            LoadState::Loading => return Err(CellDLError::LoadInProgress),
            LoadState::NoDiagram => return Ok(None),
            LoadState::Interactive => {}
        }
        self.reset_object_states();
        self.hide_tooltip();
        self.panning = false;
        self.cursor = Cursor::Default;
        self.panzoom.disable();
        self.apply_view_transform();
        self.dispatch_events();

        self.state = LoadState::NoDiagram;
        let model = self.model.take();
        if let Some(model) = &model {
            info!(uri = model.uri(); "Closed diagram");
        }
        self.listeners.dispatch(&ViewerEvent::Viewer {
            kind: ViewerEventKind::Closed,
            component: None,
        });
        Ok(model)
    }

    /// Clears the selected and active objects.
    pub fn reset_object_states(&mut self) {
        self.unset_selected_object();
        self.unset_active_object();
        self.dispatch_events();
    }

    /// Updates the diagram's properties and tells listeners the file changed.
    pub fn set_metadata<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        if let Some(model) = self.model.as_mut() {
            model.set_metadata(data);
            self.dispatch_events();
        }
    }

    /// Sends events the model has queued to the listeners.
    pub fn dispatch_events(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        for event in model.take_events() {
            self.listeners.dispatch(&event);
        }
    }

    /// Shows a tooltip, styled by the `tooltip-<style>` class unless `style`
    /// is empty. An empty message hides the tooltip.
    pub fn show_tooltip(&mut self, message: &str, style: &str) {
        if message.is_empty() {
            self.hide_tooltip();
            return;
        }
        self.tooltip = Some(Tooltip {
            message: message.to_string(),
            class: (!style.is_empty()).then(|| format!("tooltip-{style}")),
        });
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    /// Maps a point in view coordinates to diagram coordinates.
    pub fn dom_to_svg_coords(&self, point: Point) -> Point {
        self.panzoom.to_diagram(point)
    }

    /// Maps a point in diagram coordinates to view coordinates.
    pub fn svg_to_dom_coords(&self, point: Point) -> Point {
        self.panzoom.to_view(point)
    }

    /// Zooms the view by `factor` about a point in view coordinates.
    pub fn zoom_at(&mut self, point: Point, factor: f64) {
        if self.is_interactive() {
            self.panzoom.zoom_at(point, factor);
            self.apply_view_transform();
        }
    }

    pub fn zoom_in(&mut self, point: Point) {
        if self.is_interactive() {
            self.panzoom.zoom_in(point);
            self.apply_view_transform();
        }
    }

    pub fn zoom_out(&mut self, point: Point) {
        if self.is_interactive() {
            self.panzoom.zoom_out(point);
            self.apply_view_transform();
        }
    }

    /// The pointer has moved onto a shape.
    ///
    /// The object the shape belongs to becomes active. Moving onto something
    /// that isn't part of the diagram hides the tooltip and clears the
    /// active object.
    pub fn pointer_over(&mut self, event: &PointerEvent) {
        if !self.is_interactive() {
            return;
        }
        let current = self.object_at(event.target);
        if !self.is_diagram_element(event.target) {
            self.hide_tooltip();
            if self.active.is_some() && current != self.active {
                self.unset_active_object();
            }
            return;
        }
        if self.active.is_some() && current != self.active {
            self.unset_active_object();
        }
        if let Some(current) = current {
            self.set_active_object(current);
        }
    }

    /// The pointer has left a shape.
    pub fn pointer_out(&mut self, event: &PointerEvent) {
        if !self.is_interactive() {
            return;
        }
        let left_diagram = match (event.target, self.root()) {
            (Some(target), Some(root)) => target == root || !self.contains(root, target),
            _ => true,
        };
        if left_diagram {
            self.unset_active_object();
        }
    }

    /// Starts a possible pan.
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        if !self.is_interactive() {
            return;
        }
        self.pointer_moved = false;
        self.pointer_down_time = event.time_ms;
        self.cursor = Cursor::Grab;
        self.panzoom.pointer_down(event.position);
        self.panning = true;
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if !self.is_interactive() {
            return;
        }
        if self.panning {
            if self.panzoom.pointer_move(event.position) {
                self.pointer_moved = true;
                self.apply_view_transform();
            }
        } else {
            self.pointer_moved = true;
        }
    }

    pub fn pointer_up(&mut self, _event: &PointerEvent) {
        if !self.is_interactive() || !self.panning {
            return;
        }
        self.panzoom.pointer_up();
        self.panning = false;
        self.cursor = Cursor::Default;
    }

    /// A click on the diagram.
    ///
    /// The click is ignored if the pointer moved further than the click
    /// tolerance since it went down, or if it was held for at least the
    /// maximum click time. Otherwise clicking the selected object deselects
    /// it, and clicking the active object selects it.
    pub fn click(&mut self, event: &PointerEvent) {
        if !self.is_interactive() {
            return;
        }
        let in_diagram = match (event.target, self.root()) {
            (Some(target), Some(root)) => self.contains(root, target),
            _ => false,
        };
        if !in_diagram {
            return;
        }
        let held = event.time_ms.saturating_sub(self.pointer_down_time);
        if self.pointer_moved || held >= self.config.interaction().max_click_time_ms() {
            trace!(held_ms = held, moved = self.pointer_moved; "Ignoring click");
            return;
        }
        let clicked = self.object_at(event.target);
        self.listeners
            .dispatch(&ViewerEvent::ObjectClicked { id: clicked });
        self.selection_click(clicked);
    }

    /// Handles a click on `object` reported by the host, as if the object
    /// itself had been clicked.
    pub fn object_clicked(&mut self, object: Id) {
        if !self.is_interactive() {
            return;
        }
        let clicked = self
            .model
            .as_ref()
            .and_then(|model| model.object_by_id(object))
            .map(|object| object.id());
        self.selection_click(clicked);
    }

    fn is_interactive(&self) -> bool {
        self.state == LoadState::Interactive
    }

    fn root(&self) -> Option<ShapeId> {
        self.model.as_ref().map(|model| model.surface().root())
    }

    fn contains(&self, ancestor: ShapeId, shape: ShapeId) -> bool {
        self.model
            .as_ref()
            .is_some_and(|model| model.surface().contains(ancestor, shape))
    }

    fn is_diagram_element(&self, target: Option<ShapeId>) -> bool {
        let (Some(model), Some(target)) = (self.model.as_ref(), target) else {
            return false;
        };
        let surface = model.surface();
        let root = surface.root();
        target != root
            && surface.attribute(target, "id").as_deref() != Some(SVG_PANEL_ID)
            && surface.contains(root, target)
    }

    /// The loaded object a shape belongs to.
    fn object_at(&self, target: Option<ShapeId>) -> Option<Id> {
        let model = self.model.as_ref()?;
        let id = element_id(model.surface(), target?)?;
        model.object_by_id(id).map(|object| object.id())
    }

    fn selection_click(&mut self, clicked: Option<Id>) {
        let mut deselected = false;
        if let Some(selected) = self.selected {
            deselected = clicked == Some(selected);
            self.unset_selected_object();
        }
        let active = self.active;
        if let Some(clicked) = clicked.filter(|id| !deselected && active == Some(*id)) {
            self.set_selected_object(clicked);
        }
        self.dispatch_events();
    }

    fn set_active_object(&mut self, id: Id) {
        if self.active == Some(id) {
            return;
        }
        if let Some((object, surface)) = self.object_and_surface_mut(id) {
            object.activate(surface, true);
        }
        trace!(id = id.to_string(); "Activated object");
        self.active = Some(id);
    }

    fn unset_active_object(&mut self) {
        if let Some(id) = self.active.take() {
            if let Some((object, surface)) = self.object_and_surface_mut(id) {
                object.activate(surface, false);
            }
        }
    }

    fn set_selected_object(&mut self, id: Id) {
        self.unset_selected_object();
        let Some(model) = self.model.as_mut() else {
            return;
        };
        if let Some((object, surface)) = model.object_and_surface_mut(id) {
            object.select(surface, true);
            model.viewer_event(ViewerEventKind::Selected, Some(id));
            debug!(id = id.to_string(); "Selected object");
            self.selected = Some(id);
        }
    }

    fn unset_selected_object(&mut self) {
        let Some(id) = self.selected.take() else {
            return;
        };
        let Some(model) = self.model.as_mut() else {
            return;
        };
        if let Some((object, surface)) = model.object_and_surface_mut(id) {
            object.select(surface, false);
        }
        model.viewer_event(ViewerEventKind::Deselected, Some(id));
        debug!(id = id.to_string(); "Deselected object");
    }

    fn object_and_surface_mut(
        &mut self,
        id: Id,
    ) -> Option<(&mut CellDLObject, &mut dyn RenderSurface)> {
        self.model.as_mut()?.object_and_surface_mut(id)
    }

    /// Writes the pan/zoom transform to the diagram root.
    fn apply_view_transform(&mut self) {
        let transform = self.panzoom.transform();
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let root = model.surface().root();
        let value = (!transform.is_identity()).then(|| transform.to_string());
        model
            .surface_mut()
            .set_transform_attribute(root, value.as_deref());
    }
}
