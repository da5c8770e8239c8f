use std::num::NonZeroU32;
use std::rc::Rc;

use emath::Pos2;
use log::debug;

use crate::{
    OriginalRect, RectStyle, RegionTuple, Scale, SharedSurface, SurfaceRect, SurfaceRegistry,
};

/// Gestures whose normalized width or height is not strictly greater than
/// this are discarded instead of committed.
const MIN_RECT_SIDE: u32 = 5;

/// Rectangle-region selector bound to a drawing surface overlaying an image.
///
/// Tracks pointer-drag gestures to create rectangles, renders the committed
/// list plus the in-progress rectangle, and converts between surface pixels
/// and the original image's pixel space via the stored original size.
///
/// One instance per surface-and-image pairing; state is owned by the host, so
/// multiple independent selectors can coexist. Committed rectangles are kept
/// in surface space in insertion order and survive [`RegionSelector::detach`].
#[derive(Default)]
pub struct RegionSelector {
    surface: Option<SharedSurface>,
    rects: Vec<SurfaceRect>,
    original_size: Option<(NonZeroU32, NonZeroU32)>,
    editing: bool,
    drag: Option<DragState>,
    on_change: Option<Box<dyn FnMut(&[OriginalRect])>>,
}

struct DragState {
    anchor: (i32, i32),
    current: (i32, i32),
}

impl DragState {
    fn rect(&self) -> SurfaceRect {
        SurfaceRect::from_corners(self.anchor, self.current)
    }
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `surface`, supplanting any previously bound one (its pointer
    /// input is disabled first, so at most one surface is bound at a time).
    ///
    /// The new surface starts with pointer input disabled and editing off;
    /// any in-flight gesture is dropped and the surface is rendered.
    /// Rebinding the already-bound surface leaves rectangles and the original
    /// size untouched.
    pub fn attach(&mut self, surface: SharedSurface) {
        let rebind = self
            .surface
            .as_ref()
            .is_some_and(|bound| Rc::ptr_eq(bound, &surface));
        if !rebind {
            if let Some(previous) = self.surface.take() {
                previous.borrow_mut().set_pointer_events(false);
            }
        }
        surface.borrow_mut().set_pointer_events(false);
        self.surface = Some(surface);
        self.editing = false;
        self.drag = None;
        debug!("surface attached (rebind: {rebind})");
        self.render();
    }

    /// Resolves `id` through `registry` and binds the result. An unknown id
    /// fails without touching the current binding.
    pub fn attach_id(&mut self, registry: &SurfaceRegistry, id: &str) -> bool {
        match registry.resolve(id) {
            Some(surface) => {
                self.attach(surface);
                true
            }
            None => false,
        }
    }

    /// Unbinds the surface, disabling its pointer input. Rectangles, the
    /// original size, and the change listener persist for a future attach.
    pub fn detach(&mut self) {
        let Some(surface) = self.surface.take() else {
            return;
        };
        surface.borrow_mut().set_pointer_events(false);
        self.editing = false;
        self.drag = None;
        debug!("surface detached");
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Toggles whether pointer gestures are accepted. No effect while no
    /// surface is bound; never touches stored rectangles.
    pub fn enable_editing(&mut self, on: bool) {
        let Some(surface) = &self.surface else {
            return;
        };
        surface.borrow_mut().set_pointer_events(on);
        self.editing = on;
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing
    }

    /// Sets the reference dimensions for space conversion. Zero on either
    /// axis resets to "no scaling known" (surface space ≡ original space).
    /// Already-stored rectangles are not rescaled; only their interpretation
    /// through [`RegionSelector::regions`] / [`RegionSelector::set_regions`]
    /// changes.
    pub fn set_original_size(&mut self, width: u32, height: u32) {
        self.original_size = NonZeroU32::new(width).zip(NonZeroU32::new(height));
    }

    pub fn original_size(&self) -> Option<(NonZeroU32, NonZeroU32)> {
        self.original_size
    }

    /// Registers the change listener, replacing any previous one. A single
    /// slot is the contract; hosts needing multicast fan out themselves.
    pub fn on_change(&mut self, callback: impl FnMut(&[OriginalRect]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Starts a gesture at `pos` (surface coordinates, rounded to integer
    /// pixels). A down received mid-gesture restarts the anchor without
    /// committing. Ignored while editing is disabled or nothing is bound.
    pub fn pointer_down(&mut self, pos: Pos2) {
        if !self.accepts_input() {
            return;
        }
        let anchor = round_pos(pos);
        self.drag = Some(DragState {
            anchor,
            current: anchor,
        });
    }

    /// Updates the live rectangle and re-renders. Ignored outside a gesture.
    pub fn pointer_move(&mut self, pos: Pos2) {
        if !self.accepts_input() {
            return;
        }
        let Some(drag) = &mut self.drag else {
            return;
        };
        drag.current = round_pos(pos);
        self.render();
    }

    /// Ends the gesture. The normalized rectangle is committed iff both of
    /// its sides exceed 5 surface pixels; the surface is re-rendered either
    /// way to drop the live rectangle, and the change listener fires only
    /// when something was committed.
    pub fn pointer_up(&mut self, pos: Pos2) {
        if !self.accepts_input() {
            return;
        }
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        drag.current = round_pos(pos);
        let rect = drag.rect();
        let commit = rect.width > MIN_RECT_SIDE && rect.height > MIN_RECT_SIDE;
        if commit {
            debug!("committing {rect:?}");
            self.rects.push(rect);
        }
        self.render();
        if commit {
            self.emit_change();
        }
    }

    /// Clears the surface buffer and redraws every committed rectangle, then
    /// the live one if a gesture is in flight. Never mutates rectangle data;
    /// no-op while unbound.
    pub fn render(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let mut surface = surface.borrow_mut();
        surface.clear();
        for rect in &self.rects {
            surface.draw_rect(*rect, RectStyle::committed());
        }
        if let Some(drag) = &self.drag {
            surface.draw_rect(drag.rect(), RectStyle::active());
        }
    }

    /// Committed rectangles converted to original-image coordinates. With no
    /// original size set, or no usable surface dimensions, surface space is
    /// treated as original space and the numbers pass through unchanged.
    pub fn regions(&self) -> Vec<OriginalRect> {
        let scale = self.scale();
        self.rects.iter().map(|r| scale.to_original(*r)).collect()
    }

    /// Committed rectangles in surface coordinates, for hosts overlaying
    /// additional drawing in the same space.
    pub fn surface_regions(&self) -> Vec<SurfaceRect> {
        self.rects.clone()
    }

    /// Replaces the rectangle list wholesale. Input is original-space by
    /// default; tuples whose size values exceed the original bounds are read
    /// as opposite corners (see [`RegionTuple::resolve`]). The surface is
    /// re-rendered, and the change listener fires for non-empty input only —
    /// clearing via an empty list stays silent.
    pub fn set_regions<I>(&mut self, regions: I)
    where
        I: IntoIterator,
        I::Item: Into<RegionTuple>,
    {
        self.rects.clear();
        let scale = self.scale();
        let mut any = false;
        for tuple in regions {
            any = true;
            let original = tuple.into().resolve(self.original_size);
            self.rects.push(scale.to_surface(original));
        }
        self.render();
        if any {
            self.emit_change();
        }
    }

    fn accepts_input(&self) -> bool {
        self.editing && self.surface.is_some()
    }

    fn scale(&self) -> Scale {
        let Some((width, height)) = self.original_size else {
            return Scale::IDENTITY;
        };
        let surface = match &self.surface {
            Some(s) => s.borrow().size(),
            None => return Scale::IDENTITY,
        };
        Scale::new(surface, (width.get(), height.get()))
    }

    fn emit_change(&mut self) {
        if let Some(mut callback) = self.on_change.take() {
            let regions = self.regions();
            callback(&regions);
            self.on_change = Some(callback);
        }
    }
}

fn round_pos(pos: Pos2) -> (i32, i32) {
    (pos.x.round() as i32, pos.y.round() as i32)
}
