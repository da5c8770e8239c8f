use egui::{CornerRadius, Painter, Pos2, Shape, StrokeKind};

use crate::{RectStyle, Surface, SurfaceRect};

/// Retained [`Surface`] for immediate-mode hosts: rectangles are recorded as
/// [`egui::Shape`]s in surface-local coordinates and replayed every frame via
/// [`ShapeOverlay::paint`], translated to the on-screen overlay origin.
///
/// The host keeps the concrete `Rc<RefCell<ShapeOverlay>>` (to paint and to
/// track size changes) and hands a coerced
/// [`SharedSurface`](crate::SharedSurface) clone to the selector.
pub struct ShapeOverlay {
    size: (u32, u32),
    shapes: Vec<Shape>,
    pointer_events: bool,
}

impl ShapeOverlay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            shapes: Vec::new(),
            pointer_events: false,
        }
    }

    /// Updates the rendered overlay dimensions. The recorded shapes keep
    /// their surface coordinates; the host re-renders the selector when the
    /// displayed image rect changes.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    pub fn pointer_events(&self) -> bool {
        self.pointer_events
    }

    /// Replays the recorded shapes at `origin` (top-left corner of the
    /// overlay in screen coordinates).
    pub fn paint(&self, painter: &Painter, origin: Pos2) {
        for shape in &self.shapes {
            let mut shape = shape.clone();
            shape.translate(origin.to_vec2());
            painter.add(shape);
        }
    }
}

impl Surface for ShapeOverlay {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn draw_rect(&mut self, rect: SurfaceRect, style: RectStyle) {
        let rect: emath::Rect = rect.into();
        self.shapes
            .push(Shape::rect_filled(rect, CornerRadius::ZERO, style.fill));
        self.shapes.push(Shape::rect_stroke(
            rect,
            CornerRadius::ZERO,
            style.stroke,
            StrokeKind::Middle,
        ));
    }

    fn set_pointer_events(&mut self, enabled: bool) {
        self.pointer_events = enabled;
    }
}
