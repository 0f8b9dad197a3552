//! Layers and the store that owns their rasters.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Rgba;
use crate::error::{CanvasError, CanvasResult};
use crate::raster::Raster;

/// Stable layer identity, preserved across undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named raster in the layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub raster: Raster,
}

impl Layer {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            visible: true,
            raster: Raster::new(width, height),
        }
    }
}

/// Ordered layer stack. Index 0 is the bottom layer.
///
/// Every raster has the document size; the store never becomes empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStore {
    layers: Vec<Layer>,
    width: u32,
    height: u32,
}

impl LayerStore {
    /// A store with a single transparent layer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: vec![Layer::new("Layer 1", width, height)],
            width,
            height,
        }
    }

    /// Rebuild from previously captured layers (undo/redo).
    pub(crate) fn from_layers(layers: Vec<Layer>, width: u32, height: u32) -> Self {
        if layers.is_empty() {
            return Self::new(width, height);
        }
        Self {
            layers,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn top(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Append a transparent layer on top.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let layer = Layer::new(name, self.width, self.height);
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Remove a layer. The last remaining layer is never removed.
    pub fn remove_layer(&mut self, id: LayerId) -> CanvasResult<Layer> {
        let index = self.index_of(id).ok_or(CanvasError::LayerNotFound(id))?;
        if self.layers.len() == 1 {
            return Err(CanvasError::LastLayer);
        }
        Ok(self.layers.remove(index))
    }

    /// Move the layer at `from` to position `to` (both indices, bottom = 0).
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() || from == to {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        true
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> CanvasResult<()> {
        let layer = self.get_mut(id).ok_or(CanvasError::LayerNotFound(id))?;
        layer.name = name.into();
        Ok(())
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> CanvasResult<()> {
        let layer = self.get_mut(id).ok_or(CanvasError::LayerNotFound(id))?;
        layer.visible = visible;
        Ok(())
    }

    /// Replace a layer's raster with a transparent one of the same size.
    pub fn clear_layer(&mut self, id: LayerId) -> CanvasResult<()> {
        let layer = self.get_mut(id).ok_or(CanvasError::LayerNotFound(id))?;
        layer.raster = Raster::new(layer.raster.width(), layer.raster.height());
        Ok(())
    }

    /// Replace a layer's raster. The raster must have the document size.
    pub fn replace_raster(&mut self, id: LayerId, raster: Raster) -> CanvasResult<()> {
        if raster.size() != (self.width, self.height) {
            return Err(CanvasError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: raster.width(),
                actual_height: raster.height(),
            });
        }
        let layer = self.get_mut(id).ok_or(CanvasError::LayerNotFound(id))?;
        layer.raster = raster;
        Ok(())
    }

    /// Reflow every raster to a new size, placing the old content at `(dx, dy)`.
    pub fn resize_all(&mut self, width: u32, height: u32, dx: i32, dy: i32) {
        for layer in &mut self.layers {
            layer.raster = layer.raster.reflowed(width, height, dx, dy);
        }
        self.width = width;
        self.height = height;
    }

    /// The color of the top-most visible layer that has a non-transparent pixel at `(x, y)`.
    ///
    /// Transparent when no visible layer covers the point, `None` outside the document.
    pub fn sample(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let color = self
            .layers
            .iter()
            .rev()
            .filter(|l| l.visible)
            .filter_map(|l| l.raster.pixel(x, y))
            .find(|c| c.a > 0);
        Some(color.unwrap_or_else(Rgba::transparent))
    }

    /// Source-over composite of all visible layers at full opacity.
    pub fn flatten(&self) -> Raster {
        let mut out = Raster::new(self.width, self.height);
        for layer in self.layers.iter().filter(|l| l.visible) {
            out.composite(&layer.raster, 1.0);
        }
        out
    }

    /// Distinct colors of the flattened image.
    pub fn extract_palette(&self) -> Vec<Rgba> {
        self.flatten().extract_palette()
    }
}
