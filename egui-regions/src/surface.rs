use std::{cell::RefCell, collections::HashMap, rc::Rc};

use egui::{Color32, Stroke};

use crate::SurfaceRect;

/// Drawing surface the selector binds to: a transparent overlay positioned
/// over a displayed image, with queryable pixel dimensions, an immediate-mode
/// rectangle drawing primitive, and a hit-testing toggle.
///
/// Surfaces start with pointer input disabled; the selector enables it
/// through [`RegionSelector::enable_editing`](crate::RegionSelector::enable_editing).
pub trait Surface {
    /// Rendered pixel dimensions of the overlay.
    fn size(&self) -> (u32, u32);

    /// Drops everything drawn so far.
    fn clear(&mut self);

    fn draw_rect(&mut self, rect: SurfaceRect, style: RectStyle);

    /// Toggles whether the surface participates in pointer hit-testing.
    fn set_pointer_events(&mut self, enabled: bool);
}

/// A surface shared between the selector and its host. All access happens on
/// the UI thread.
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// Stroke + translucent fill applied to a drawn rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    pub stroke: Stroke,
    pub fill: Color32,
}

impl RectStyle {
    /// Treatment for committed rectangles.
    pub fn committed() -> Self {
        Self {
            stroke: Stroke::new(2.0, Color32::RED),
            fill: Color32::from_rgba_unmultiplied(255, 0, 0, 38),
        }
    }

    /// Distinct treatment for the rectangle still being dragged.
    pub fn active() -> Self {
        Self {
            stroke: Stroke::new(2.0, Color32::BLUE),
            fill: Color32::from_rgba_unmultiplied(0, 0, 255, 38),
        }
    }
}

/// Host-side id → surface map, the analogue of looking an overlay element up
/// by id. Used by [`RegionSelector::attach_id`](crate::RegionSelector::attach_id).
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<String, SharedSurface>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `surface` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, surface: SharedSurface) {
        self.surfaces.insert(id.into(), surface);
    }

    pub fn resolve(&self, id: &str) -> Option<SharedSurface> {
        self.surfaces.get(id).cloned()
    }
}
