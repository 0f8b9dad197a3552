//! Rectangular selection: marquee, floating buffer, move and clipboard.

use crate::color::Paint;
use crate::drawing::PixelPoint;
use crate::raster::{PixelRect, Raster};

/// An in-progress move of a floating buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDrag {
    /// Pixel where the drag started.
    pub start: PixelPoint,
    /// Buffer origin when the drag started.
    pub original: PixelPoint,
}

/// Pixels lifted out of a layer, owned until stamped back or discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingSelection {
    pub buffer: Raster,
    /// Current top-left position in document pixels.
    pub origin: PixelPoint,
    /// Region the pixels came from. `None` for pasted buffers.
    pub source: Option<PixelRect>,
    /// Clear `source` when the buffer is committed (move mode).
    pub clear_source: bool,
    pub drag: Option<MoveDrag>,
}

impl FloatingSelection {
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(
            self.origin.0,
            self.origin.1,
            self.buffer.width() as i32,
            self.buffer.height() as i32,
        )
    }

    /// Hit test used to start a move. The far edges count as inside.
    pub fn hit(&self, x: i32, y: i32) -> bool {
        let b = self.bounds();
        x >= b.x0 && x <= b.x1 && y >= b.y0 && y <= b.y1
    }

    pub fn is_moving(&self) -> bool {
        self.drag.is_some()
    }
}

/// Selection state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    None,
    /// A rectangle being dragged out, or marked but not lifted.
    Marquee {
        anchor: PixelPoint,
        end: PixelPoint,
        dragging: bool,
    },
    Floating(FloatingSelection),
}

#[derive(Debug, Clone, PartialEq)]
struct Clipboard {
    buffer: Raster,
    origin: PixelPoint,
}

/// Owns the selection state and the internal clipboard.
///
/// Layer rasters are passed in per call; nothing here keeps a reference to layer data.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    state: SelectionState,
    clipboard: Option<Clipboard>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn floating(&self) -> Option<&FloatingSelection> {
        match &self.state {
            SelectionState::Floating(floating) => Some(floating),
            _ => None,
        }
    }

    /// Normalized bounds of whatever is selected, independent of drag direction.
    pub fn bounds(&self) -> Option<PixelRect> {
        match &self.state {
            SelectionState::None => None,
            SelectionState::Marquee { anchor, end, .. } => Some(PixelRect::from_corners(*anchor, *end)),
            SelectionState::Floating(floating) => Some(floating.bounds()),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::None)
    }

    /// True whenever a floating buffer exists.
    pub fn is_valid_selection(&self) -> bool {
        self.floating().is_some()
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Marquee { dragging: true, .. })
    }

    pub fn is_moving(&self) -> bool {
        self.floating().is_some_and(FloatingSelection::is_moving)
    }

    pub fn hit_floating(&self, x: i32, y: i32) -> bool {
        self.floating().is_some_and(|f| f.hit(x, y))
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Begin a marquee at `(x, y)`, discarding any floating buffer.
    pub fn start_selection(&mut self, x: i32, y: i32) {
        if self.is_valid_selection() {
            log::debug!("Discarding floating selection for a new marquee");
        }
        self.state = SelectionState::Marquee {
            anchor: (x, y),
            end: (x, y),
            dragging: true,
        };
    }

    pub fn update_selection(&mut self, x: i32, y: i32) -> bool {
        match &mut self.state {
            SelectionState::Marquee {
                end,
                dragging: true,
                ..
            } => {
                let changed = *end != (x, y);
                *end = (x, y);
                changed
            }
            _ => false,
        }
    }

    /// Finish the marquee drag and lift its pixels into a floating buffer.
    ///
    /// The layer is only read. With `clear_original` the source region is cleared later, when
    /// the buffer is committed, so cancelling a lift never loses pixels. A zero-area marquee
    /// clears the selection; without a layer the marquee stays marked. Returns `true` when a
    /// buffer was lifted.
    pub fn finish_selection(&mut self, layer: Option<&Raster>, clear_original: bool) -> bool {
        let SelectionState::Marquee { anchor, end, .. } = self.state else {
            return false;
        };
        let rect = PixelRect::from_corners(anchor, end);
        if rect.is_empty() {
            self.state = SelectionState::None;
            return false;
        }
        let Some(layer) = layer else {
            self.state = SelectionState::Marquee {
                anchor,
                end,
                dragging: false,
            };
            return false;
        };

        let buffer = layer.extract(rect);
        log::debug!(
            "Lifted {}x{} selection at ({}, {})",
            rect.width(),
            rect.height(),
            rect.x0,
            rect.y0
        );
        self.state = SelectionState::Floating(FloatingSelection {
            buffer,
            origin: (rect.x0, rect.y0),
            source: Some(rect),
            clear_source: clear_original,
            drag: None,
        });
        true
    }

    /// Start dragging the floating buffer if `(x, y)` hits it.
    pub fn begin_move(&mut self, x: i32, y: i32) -> bool {
        match &mut self.state {
            SelectionState::Floating(floating) if floating.hit(x, y) => {
                floating.drag = Some(MoveDrag {
                    start: (x, y),
                    original: floating.origin,
                });
                true
            }
            _ => false,
        }
    }

    /// Relocate the buffer to `original + (pointer - start)`.
    pub fn update_move(&mut self, x: i32, y: i32) -> bool {
        let SelectionState::Floating(floating) = &mut self.state else {
            return false;
        };
        let Some(drag) = floating.drag else {
            return false;
        };
        let origin = (
            drag.original.0 + x - drag.start.0,
            drag.original.1 + y - drag.start.1,
        );
        let changed = floating.origin != origin;
        floating.origin = origin;
        changed
    }

    /// Stamp the dragged buffer at its new origin and clear the floating state.
    ///
    /// In move mode the source region is cleared first. Opaque pixels replace the destination;
    /// transparent ones leave it untouched.
    pub fn finish_move(&mut self, layer: Option<&mut Raster>) -> bool {
        if !self.is_moving() {
            return false;
        }
        let Some(layer) = layer else {
            if let SelectionState::Floating(floating) = &mut self.state {
                floating.drag = None;
            }
            return false;
        };
        let SelectionState::Floating(floating) = std::mem::take(&mut self.state) else {
            return false;
        };
        log::debug!(
            "Dropping selection at ({}, {})",
            floating.origin.0,
            floating.origin.1
        );
        commit_floating(floating, layer)
    }

    /// Delete the selection.
    ///
    /// A floating buffer is discarded without being written back and its source region is
    /// cleared. A marked marquee is cleared in place.
    pub fn delete_selection(&mut self, layer: Option<&mut Raster>) -> bool {
        let Some(layer) = layer else {
            return false;
        };
        match std::mem::take(&mut self.state) {
            SelectionState::None => false,
            SelectionState::Marquee { anchor, end, .. } => {
                layer.fill_rect(PixelRect::from_corners(anchor, end), Paint::Transparent)
            }
            SelectionState::Floating(floating) => match floating.source {
                Some(source) => layer.fill_rect(source, Paint::Transparent),
                None => false,
            },
        }
    }

    /// Cancel without touching layer data. Returns `true` if anything was selected.
    ///
    /// A lifted buffer whose source was never cleared simply disappears; the layer still holds
    /// its pixels.
    pub fn clear_selection(&mut self) -> bool {
        let had = self.is_active();
        self.state = SelectionState::None;
        had
    }

    /// Copy the floating buffer, or the marked region of `layer`, into the clipboard.
    pub fn copy(&mut self, layer: Option<&Raster>) -> bool {
        let clip = match &self.state {
            SelectionState::None => None,
            SelectionState::Floating(floating) => Some(Clipboard {
                buffer: floating.buffer.clone(),
                origin: floating.origin,
            }),
            SelectionState::Marquee { anchor, end, .. } => {
                let rect = PixelRect::from_corners(*anchor, *end);
                match layer {
                    Some(layer) if !rect.is_empty() => Some(Clipboard {
                        buffer: layer.extract(rect),
                        origin: (rect.x0, rect.y0),
                    }),
                    _ => None,
                }
            }
        };
        match clip {
            Some(clip) => {
                self.clipboard = Some(clip);
                true
            }
            None => false,
        }
    }

    /// Float a fresh copy of the clipboard at the position it was copied from.
    pub fn paste(&mut self) -> bool {
        let Some(clip) = &self.clipboard else {
            return false;
        };
        self.state = SelectionState::Floating(FloatingSelection {
            buffer: clip.buffer.clone(),
            origin: clip.origin,
            source: None,
            clear_source: false,
            drag: None,
        });
        true
    }

    /// Drop the floating buffer into `layer` where it currently sits.
    pub fn anchor(&mut self, layer: &mut Raster) -> bool {
        let SelectionState::Floating(floating) = std::mem::take(&mut self.state) else {
            return false;
        };
        commit_floating(floating, layer)
    }
}

fn commit_floating(floating: FloatingSelection, layer: &mut Raster) -> bool {
    let cleared = match floating.source {
        Some(source) if floating.clear_source => layer.fill_rect(source, Paint::Transparent),
        _ => false,
    };
    let stamped = layer.blit(&floating.buffer, floating.origin.0, floating.origin.1);
    cleared || stamped
}
