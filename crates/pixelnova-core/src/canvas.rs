//! The editing surface: owns the document and routes input to tools.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::config::{self, EditorConfig};
use crate::drawing::PixelPoint;
use crate::error::{CanvasError, CanvasResult};
use crate::history::{HistoryEntry, HistoryStack};
use crate::input::{self, Command, KeyEvent, PointerButton, PointerEvent, ShortcutRegistry};
use crate::layer::{LayerId, LayerStore};
use crate::raster::{PixelRect, Raster};
use crate::redraw::RedrawScheduler;
use crate::selection::SelectionManager;
use crate::tools::{StrokeInput, Tool, ToolContext, ToolKind, ToolOutcome, visible_raster};
use crate::viewport::Viewport;

/// Horizontal placement of existing content when the document is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical placement of existing content when the document is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeAnchor {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl ResizeAnchor {
    pub const fn new(horizontal: HorizontalAnchor, vertical: VerticalAnchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Where the old top-left corner lands in the resized document.
    pub fn offset(&self, old: (u32, u32), new: (u32, u32)) -> (i32, i32) {
        let dw = new.0 as i32 - old.0 as i32;
        let dh = new.1 as i32 - old.1 as i32;
        let dx = match self.horizontal {
            HorizontalAnchor::Left => 0,
            HorizontalAnchor::Center => dw.div_euclid(2),
            HorizontalAnchor::Right => dw,
        };
        let dy = match self.vertical {
            VerticalAnchor::Top => 0,
            VerticalAnchor::Center => dh.div_euclid(2),
            VerticalAnchor::Bottom => dh,
        };
        (dx, dy)
    }
}

/// Notifications for the host UI, collected until [`Canvas::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    /// The eyedropper picked a color. It has already been applied to the matching slot.
    ColorPicked { color: Rgba, secondary: bool },
    /// Whether a floating selection exists changed.
    SelectionChanged { valid: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Stroke(PointerButton),
    Pan { last: Point },
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Start,
    Move,
    End,
}

/// Runtime canvas state.
#[derive(Debug)]
pub struct Canvas {
    config: EditorConfig,
    layers: LayerStore,
    selected_layer: LayerId,
    viewport: Viewport,
    /// Size of the host element in screen units.
    container: Size,
    fitted: bool,
    tool: Tool,
    shape_filled: bool,
    primary_color: Rgba,
    secondary_color: Rgba,
    brush_size: u32,
    bucket_tolerance: u8,
    clear_original: bool,
    grid_enabled: bool,
    selection: SelectionManager,
    /// Last selection validity reported through events.
    selection_valid: bool,
    history: HistoryStack,
    redraw: RedrawScheduler,
    events: Vec<CanvasEvent>,
    hover: Option<PixelPoint>,
    focused: bool,
    space_held: bool,
    gesture: Gesture,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl Canvas {
    /// Create a canvas with one transparent layer.
    pub fn new(config: EditorConfig) -> CanvasResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        let layers = LayerStore::new(config.document_width, config.document_height);
        let selected_layer = layers.top().map(|l| l.id).unwrap_or_default();
        let mut canvas = Self {
            viewport: Viewport::new(config.initial_scale, config.min_scale, config.max_scale),
            container: Size::ZERO,
            fitted: false,
            tool: Tool::new(ToolKind::default(), false),
            shape_filled: false,
            primary_color: config.primary_color,
            secondary_color: config.secondary_color,
            brush_size: config.brush_size,
            bucket_tolerance: config.bucket_tolerance,
            clear_original: config.clear_original,
            grid_enabled: config.grid_enabled,
            selection: SelectionManager::new(),
            selection_valid: false,
            history: HistoryStack::new(config.history_depth),
            redraw: RedrawScheduler::new(),
            events: Vec::new(),
            hover: None,
            focused: true,
            space_held: false,
            gesture: Gesture::Idle,
            layers,
            selected_layer,
            config,
        };
        canvas.push_history();
        canvas.redraw.request();
        canvas
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.layers.width()
    }

    pub fn height(&self) -> u32 {
        self.layers.height()
    }

    pub fn document_size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn selected_layer_id(&self) -> LayerId {
        self.selected_layer
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn hover_position(&self) -> Option<PixelPoint> {
        self.hover
    }

    // --- Redraw & events ---

    pub fn request_redraw(&mut self) {
        self.redraw.request();
    }

    /// True at most once per batch of changes; the host composites when it returns true.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Viewport ---

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn container_size(&self) -> Size {
        self.container
    }

    /// Set the host element size. The first call fits the document into it.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container = Size::new(width, height);
        if !self.fitted && !self.container.is_zero_area() {
            self.fit();
            self.fitted = true;
        }
        self.redraw.request();
    }

    pub fn fit(&mut self) {
        self.viewport.fit(self.container, self.document_size());
        self.redraw.request();
    }

    pub fn center(&mut self) {
        self.viewport.center(self.container, self.document_size());
        self.redraw.request();
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.redraw.request();
    }

    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> CanvasResult<()> {
        self.viewport.zoom_at(factor, anchor)?;
        self.redraw.request();
        Ok(())
    }

    pub fn set_scale(&mut self, scale: f64) -> CanvasResult<()> {
        self.viewport.set_scale(scale)?;
        self.redraw.request();
        Ok(())
    }

    pub fn screen_to_canvas(&self, screen: Point) -> PixelPoint {
        self.viewport.screen_to_canvas(screen)
    }

    // --- Tool settings ---

    pub fn active_tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn is_stroke_active(&self) -> bool {
        matches!(self.gesture, Gesture::Stroke(_))
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    /// Switch tools. An active stroke is finished first; leaving the select tool clears the
    /// selection.
    pub fn set_active_tool(&mut self, kind: ToolKind) {
        if kind == self.tool.kind() {
            return;
        }
        if self.is_stroke_active() {
            let outcome = self.finish_stroke();
            self.apply(outcome);
        }
        if self.tool.kind() == ToolKind::Select {
            self.clear_selection();
        }
        log::debug!("Tool changed to {}", kind.name());
        self.tool = Tool::new(kind, self.shape_filled);
        self.redraw.request();
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: u32) -> CanvasResult<()> {
        config::validate_brush_size(size, self.config.max_brush_size)?;
        self.brush_size = size;
        self.redraw.request();
        Ok(())
    }

    pub fn bucket_tolerance(&self) -> u8 {
        self.bucket_tolerance
    }

    pub fn set_bucket_tolerance(&mut self, tolerance: u8) -> CanvasResult<()> {
        config::validate_tolerance(tolerance)?;
        self.bucket_tolerance = tolerance;
        Ok(())
    }

    pub fn primary_color(&self) -> Rgba {
        self.primary_color
    }

    pub fn secondary_color(&self) -> Rgba {
        self.secondary_color
    }

    pub fn set_primary_color(&mut self, color: Rgba) {
        self.primary_color = color;
    }

    pub fn set_secondary_color(&mut self, color: Rgba) {
        self.secondary_color = color;
    }

    /// Set a color slot from a CSS-like string (`#rrggbb`, `rgba(...)`, ...).
    pub fn set_color_str(&mut self, color: &str, secondary: bool) -> CanvasResult<()> {
        let parsed =
            Rgba::parse(color).ok_or_else(|| CanvasError::Config(format!("invalid color {color:?}")))?;
        if secondary {
            self.secondary_color = parsed;
        } else {
            self.primary_color = parsed;
        }
        Ok(())
    }

    pub fn shape_filled(&self) -> bool {
        self.shape_filled
    }

    pub fn set_shape_filled(&mut self, filled: bool) {
        self.shape_filled = filled;
        self.tool.set_filled(filled);
    }

    pub fn clear_original(&self) -> bool {
        self.clear_original
    }

    pub fn set_clear_original(&mut self, clear: bool) {
        self.clear_original = clear;
    }

    pub fn grid_enabled(&self) -> bool {
        self.grid_enabled
    }

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.grid_enabled = enabled;
        self.redraw.request();
    }

    /// The pixel grid is drawn only when enabled and zoomed in far enough.
    pub fn grid_visible(&self) -> bool {
        self.grid_enabled && self.viewport.scale >= self.config.grid_min_scale
    }

    /// Footprint of the brush under the pointer, for the hover preview.
    pub fn brush_cursor(&self) -> Option<PixelRect> {
        if !self.tool.kind().uses_brush() || self.gesture != Gesture::Idle {
            return None;
        }
        let (x, y) = self.hover?;
        let size = self.brush_size as i32;
        let o = size / 2;
        Some(PixelRect::new(x - o, y - o, size, size))
    }

    // --- Pointer input ---

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Leave => self.pointer_leave(),
            PointerEvent::Wheel { position, delta_y } => self.wheel(position, delta_y),
        }
    }

    pub fn pointer_down(&mut self, position: Point, button: PointerButton) {
        if self.gesture != Gesture::Idle {
            return;
        }
        self.hover = Some(self.viewport.screen_to_canvas(position));

        if button == PointerButton::Middle || (button == PointerButton::Primary && self.space_held) {
            self.gesture = Gesture::Pan { last: position };
            return;
        }
        if !button.is_stroke_button() {
            return;
        }
        if !self.layers.get(self.selected_layer).is_some_and(|l| l.visible) {
            log::warn!("Selected layer is missing or hidden; ignoring stroke");
            return;
        }

        self.gesture = Gesture::Stroke(button);
        let input = self.stroke_input(position, button);
        log::debug!("Stroke start with {} at {:?}", self.tool.kind().name(), input.pixel);
        let outcome = self.dispatch(Phase::Start, input);
        self.apply(outcome);
    }

    pub fn pointer_move(&mut self, position: Point) {
        let pixel = self.viewport.screen_to_canvas(position);
        let hover_changed = self.hover != Some(pixel);
        self.hover = Some(pixel);

        match self.gesture {
            Gesture::Pan { last } => {
                self.viewport.pan(position - last);
                self.gesture = Gesture::Pan { last: position };
                self.redraw.request();
            }
            Gesture::Stroke(button) => {
                let input = self.stroke_input(position, button);
                let outcome = self.dispatch(Phase::Move, input);
                self.apply(outcome);
            }
            Gesture::Idle => {
                if hover_changed && self.tool.kind().uses_brush() {
                    self.redraw.request();
                }
            }
        }
    }

    pub fn pointer_up(&mut self, position: Point, button: PointerButton) {
        match self.gesture {
            Gesture::Pan { .. } => {
                self.gesture = Gesture::Idle;
            }
            Gesture::Stroke(active) if active == button => {
                self.gesture = Gesture::Idle;
                let input = self.stroke_input(position, button);
                let outcome = self.dispatch(Phase::End, input);
                log::debug!("Stroke end, committed: {}", outcome.committed);
                self.apply(outcome);
            }
            _ => {}
        }
    }

    /// The pointer left the canvas: end any stroke as if released, drop the hover preview.
    pub fn pointer_leave(&mut self) {
        if self.hover.take().is_some() {
            self.redraw.request();
        }
        match self.gesture {
            Gesture::Pan { .. } => self.gesture = Gesture::Idle,
            Gesture::Stroke(_) => {
                let outcome = self.finish_stroke();
                self.apply(outcome);
            }
            Gesture::Idle => {}
        }
    }

    pub fn wheel(&mut self, position: Point, delta_y: f64) {
        self.viewport.zoom_wheel(delta_y, position);
        self.redraw.request();
    }

    fn stroke_input(&self, position: Point, button: PointerButton) -> StrokeInput {
        StrokeInput {
            pixel: self.viewport.screen_to_canvas(position),
            screen: position,
            button,
        }
    }

    fn finish_stroke(&mut self) -> ToolOutcome {
        self.gesture = Gesture::Idle;
        // An unfinished marquee is dropped rather than lifted.
        if self.tool.kind() == ToolKind::Select && self.selection.is_selecting() {
            self.selection.clear_selection();
            self.tool = Tool::new(ToolKind::Select, self.shape_filled);
            return ToolOutcome::redraw(true);
        }
        let mut ctx = ToolContext {
            viewport: &mut self.viewport,
            layers: &mut self.layers,
            selected_layer_id: self.selected_layer,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            brush_size: self.brush_size,
            bucket_tolerance: self.bucket_tolerance,
            selection: &mut self.selection,
            clear_original: self.clear_original,
        };
        self.tool.finish(&mut ctx)
    }

    fn dispatch(&mut self, phase: Phase, input: StrokeInput) -> ToolOutcome {
        let mut ctx = ToolContext {
            viewport: &mut self.viewport,
            layers: &mut self.layers,
            selected_layer_id: self.selected_layer,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            brush_size: self.brush_size,
            bucket_tolerance: self.bucket_tolerance,
            selection: &mut self.selection,
            clear_original: self.clear_original,
        };
        match phase {
            Phase::Start => self.tool.on_start(&mut ctx, input),
            Phase::Move => self.tool.on_move(&mut ctx, input),
            Phase::End => self.tool.on_end(&mut ctx, input),
        }
    }

    fn apply(&mut self, outcome: ToolOutcome) {
        if let Some(picked) = outcome.picked {
            if picked.secondary {
                self.secondary_color = picked.color;
            } else {
                self.primary_color = picked.color;
            }
            self.events.push(CanvasEvent::ColorPicked {
                color: picked.color,
                secondary: picked.secondary,
            });
        }
        if outcome.committed {
            self.push_history();
        }
        if outcome.redraw || outcome.committed {
            self.redraw.request();
        }
        self.note_selection_change();
    }

    fn note_selection_change(&mut self) {
        let valid = self.selection.is_valid_selection();
        if valid != self.selection_valid {
            self.selection_valid = valid;
            self.events.push(CanvasEvent::SelectionChanged { valid });
        }
    }

    // --- Keyboard input ---

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Keyboard handling is only active while focused. Losing focus releases a held space.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.space_held = false;
            if self.is_panning() {
                self.gesture = Gesture::Idle;
            }
        }
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    /// Returns `true` when the key was consumed.
    ///
    /// Space held during a stroke does not interrupt it; it only turns the next primary
    /// press into a pan.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if !self.focused {
            return false;
        }
        match event {
            KeyEvent::Pressed {
                key,
                modifiers,
                repeat,
            } => {
                if input::is_space(key) {
                    if !repeat {
                        self.space_held = true;
                    }
                    return true;
                }
                match ShortcutRegistry::lookup(key, *modifiers) {
                    Some(command) => {
                        self.execute(command);
                        true
                    }
                    None => false,
                }
            }
            KeyEvent::Released { key } => {
                if !input::is_space(key) {
                    return false;
                }
                self.space_held = false;
                if self.is_panning() {
                    self.gesture = Gesture::Idle;
                }
                true
            }
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::SelectTool(kind) => self.set_active_tool(kind),
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Copy => {
                self.copy();
            }
            Command::Paste => {
                self.paste();
            }
            Command::ClearSelection => {
                self.clear_selection();
            }
            Command::DeleteSelection => {
                self.delete_selection();
            }
        }
    }

    // --- Selection ---

    pub fn is_valid_selection(&self) -> bool {
        self.selection.is_valid_selection()
    }

    pub fn copy(&mut self) -> bool {
        let layer = self.layers.get(self.selected_layer).map(|l| &l.raster);
        self.selection.copy(layer)
    }

    /// Float the clipboard and switch to the select tool. An active stroke is committed first.
    pub fn paste(&mut self) -> bool {
        if !self.selection.has_clipboard() {
            return false;
        }
        if self.is_stroke_active() {
            let outcome = self.finish_stroke();
            self.apply(outcome);
        }
        if !self.selection.paste() {
            return false;
        }
        if self.tool.kind() != ToolKind::Select {
            self.tool = Tool::new(ToolKind::Select, self.shape_filled);
        }
        self.redraw.request();
        self.note_selection_change();
        true
    }

    /// Delete the selected pixels. Pushes history when layer data changed.
    pub fn delete_selection(&mut self) -> bool {
        if !self.selection.is_active() {
            return false;
        }
        let target = visible_raster(&mut self.layers, self.selected_layer);
        if target.is_none() {
            return false;
        }
        let changed = self.selection.delete_selection(target);
        if changed {
            self.push_history();
        }
        self.redraw.request();
        self.note_selection_change();
        true
    }

    /// Cancel the selection without touching layer data.
    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear_selection() {
            return false;
        }
        if self.tool.kind() == ToolKind::Select && self.tool.is_active() {
            self.tool = Tool::new(ToolKind::Select, self.shape_filled);
            self.gesture = Gesture::Idle;
        }
        self.redraw.request();
        self.note_selection_change();
        true
    }

    // --- Layers ---

    pub fn layer_buffer(&self, id: LayerId) -> Option<&Raster> {
        self.layers.get(id).map(|l| &l.raster)
    }

    pub fn flatten(&self) -> Raster {
        self.layers.flatten()
    }

    pub fn extract_palette(&self) -> Vec<Rgba> {
        self.layers.extract_palette()
    }

    /// Add a transparent layer on top and select it.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let id = self.layers.add_layer(name);
        self.selected_layer = id;
        self.structural_edit();
        id
    }

    /// Remove a layer; the last layer cannot be removed.
    pub fn remove_layer(&mut self, id: LayerId) -> CanvasResult<()> {
        self.layers.remove_layer(id)?;
        if self.selected_layer == id {
            if let Some(top) = self.layers.top() {
                self.selected_layer = top.id;
            }
            self.selection.clear_selection();
        }
        self.structural_edit();
        Ok(())
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if !self.layers.move_layer(from, to) {
            return false;
        }
        self.structural_edit();
        true
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> CanvasResult<()> {
        self.layers.rename_layer(id, name)?;
        self.structural_edit();
        Ok(())
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> CanvasResult<()> {
        self.layers.set_visible(id, visible)?;
        self.structural_edit();
        Ok(())
    }

    /// Change the drawing target. Does not create a history entry.
    pub fn select_layer(&mut self, id: LayerId) -> CanvasResult<()> {
        if self.layers.get(id).is_none() {
            return Err(CanvasError::LayerNotFound(id));
        }
        self.selected_layer = id;
        self.redraw.request();
        Ok(())
    }

    pub fn clear_layer(&mut self, id: LayerId) -> CanvasResult<()> {
        self.layers.clear_layer(id)?;
        self.structural_edit();
        Ok(())
    }

    /// Replace the selected layer's pixels with a decoded image of the document size.
    pub fn import_image(&mut self, raster: Raster) -> CanvasResult<()> {
        let (w, h) = raster.size();
        if let Err(err) = self.layers.replace_raster(self.selected_layer, raster) {
            log::warn!("Import rejected: {err}");
            return Err(err);
        }
        log::info!("Imported {w}x{h} image into layer {}", self.selected_layer);
        self.viewport.center(self.container, self.document_size());
        self.structural_edit();
        Ok(())
    }

    /// Resize the document. Content is placed according to `anchor`, cropped where it falls
    /// outside, and the uncovered area is transparent.
    pub fn resize_canvas(&mut self, width: u32, height: u32, anchor: ResizeAnchor) -> CanvasResult<()> {
        if let Err(err) = config::validate_dimensions(width, height) {
            log::warn!("Resize rejected: {err}");
            return Err(err);
        }
        let old = (self.width(), self.height());
        let (dx, dy) = anchor.offset(old, (width, height));
        self.cancel_gesture();
        self.layers.resize_all(width, height, dx, dy);
        self.selection.clear_selection();
        log::info!("Resized canvas from {}x{} to {width}x{height}", old.0, old.1);
        self.viewport.center(self.container, self.document_size());
        self.structural_edit();
        Ok(())
    }

    fn structural_edit(&mut self) {
        self.push_history();
        self.redraw.request();
        self.note_selection_change();
    }

    fn cancel_gesture(&mut self) {
        if self.gesture != Gesture::Idle {
            self.gesture = Gesture::Idle;
            self.tool = Tool::new(self.tool.kind(), self.shape_filled);
        }
    }

    // --- History ---

    fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            layers: self.layers.layers().to_vec(),
            selected_layer_id: self.selected_layer,
            width: self.width(),
            height: self.height(),
        }
    }

    fn push_history(&mut self) {
        let entry = self.snapshot();
        self.history.push(entry);
    }

    fn restore(&mut self, entry: HistoryEntry) {
        let resized = (entry.width, entry.height) != (self.width(), self.height());
        self.cancel_gesture();
        self.layers = LayerStore::from_layers(entry.layers, entry.width, entry.height);
        self.selected_layer = match self.layers.get(entry.selected_layer_id) {
            Some(layer) => layer.id,
            None => self.layers.top().map(|l| l.id).unwrap_or(entry.selected_layer_id),
        };
        self.selection.clear_selection();
        if resized {
            self.viewport.center(self.container, self.document_size());
        }
        self.redraw.request();
        self.note_selection_change();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(entry) => {
                log::debug!("Undo");
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(entry) => {
                log::debug!("Redo");
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
