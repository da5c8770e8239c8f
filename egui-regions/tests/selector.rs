use std::cell::RefCell;
use std::rc::Rc;

use egui_regions::{
    OriginalRect, RectStyle, RegionSelector, SharedSurface, Surface, SurfaceRect, SurfaceRegistry,
};
use emath::pos2;

/// Surface that records every draw call since the last clear.
struct TestSurface {
    size: (u32, u32),
    pointer_events: bool,
    drawn: Vec<(SurfaceRect, RectStyle)>,
    clears: usize,
}

impl TestSurface {
    fn new(width: u32, height: u32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            size: (width, height),
            pointer_events: false,
            drawn: Vec::new(),
            clears: 0,
        }))
    }
}

impl Surface for TestSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) {
        self.drawn.clear();
        self.clears += 1;
    }

    fn draw_rect(&mut self, rect: SurfaceRect, style: RectStyle) {
        self.drawn.push((rect, style));
    }

    fn set_pointer_events(&mut self, enabled: bool) {
        self.pointer_events = enabled;
    }
}

fn shared(surface: &Rc<RefCell<TestSurface>>) -> SharedSurface {
    surface.clone()
}

/// Selector with editing enabled on a surface of the given size, plus a log
/// of every change-listener invocation.
fn editable_selector(
    width: u32,
    height: u32,
) -> (
    RegionSelector,
    Rc<RefCell<TestSurface>>,
    Rc<RefCell<Vec<Vec<OriginalRect>>>>,
) {
    let surface = TestSurface::new(width, height);
    let mut selector = RegionSelector::new();
    selector.attach(shared(&surface));
    selector.enable_editing(true);

    let calls: Rc<RefCell<Vec<Vec<OriginalRect>>>> = Rc::default();
    let calls_in_listener = calls.clone();
    selector.on_change(move |regions| {
        calls_in_listener.borrow_mut().push(regions.to_vec());
    });
    (selector, surface, calls)
}

fn drag(selector: &mut RegionSelector, from: (f32, f32), to: (f32, f32)) {
    selector.pointer_down(pos2(from.0, from.1));
    selector.pointer_move(pos2(to.0, to.1));
    selector.pointer_up(pos2(to.0, to.1));
}

#[test]
fn drag_commits_normalized_rect() {
    let (mut selector, _, calls) = editable_selector(200, 200);

    // Dragged up-left: the committed rect is still top-left + positive size.
    drag(&mut selector, (40.0, 40.0), (10.0, 10.0));

    assert_eq!(selector.surface_regions(), [SurfaceRect::new(10, 10, 30, 30)]);
    assert_eq!(*calls.borrow(), vec![vec![OriginalRect::new(10, 10, 30, 30)]]);
}

#[test]
fn small_gestures_are_discarded_silently() {
    let (mut selector, _, calls) = editable_selector(200, 200);

    // 5x5 is not strictly greater than the threshold on either axis.
    drag(&mut selector, (10.0, 10.0), (15.0, 15.0));
    // One conforming side is not enough.
    drag(&mut selector, (10.0, 10.0), (15.0, 40.0));

    assert!(selector.surface_regions().is_empty());
    assert!(calls.borrow().is_empty());

    // 6x6 commits.
    drag(&mut selector, (10.0, 10.0), (16.0, 16.0));
    assert_eq!(selector.surface_regions(), [SurfaceRect::new(10, 10, 6, 6)]);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn disabled_editing_ignores_gestures() {
    let surface = TestSurface::new(100, 100);
    let mut selector = RegionSelector::new();
    selector.attach(shared(&surface));

    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));
    assert!(selector.surface_regions().is_empty());

    selector.enable_editing(true);
    selector.enable_editing(false);
    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));
    assert!(selector.surface_regions().is_empty());
}

#[test]
fn last_pointer_down_wins() {
    let (mut selector, _, _) = editable_selector(200, 200);

    selector.pointer_down(pos2(0.0, 0.0));
    selector.pointer_move(pos2(30.0, 30.0));
    // Restarts the gesture; the first anchor is abandoned uncommitted.
    selector.pointer_down(pos2(20.0, 20.0));
    selector.pointer_up(pos2(50.0, 50.0));

    assert_eq!(selector.surface_regions(), [SurfaceRect::new(20, 20, 30, 30)]);
}

#[test]
fn move_and_up_without_down_are_ignored() {
    let (mut selector, surface, calls) = editable_selector(100, 100);

    selector.pointer_move(pos2(10.0, 10.0));
    selector.pointer_up(pos2(60.0, 60.0));

    assert!(selector.surface_regions().is_empty());
    assert!(calls.borrow().is_empty());
    assert!(surface.borrow().drawn.is_empty());
}

#[test]
fn live_rect_uses_distinct_style_and_disappears_on_release() {
    let (mut selector, surface, _) = editable_selector(200, 200);
    drag(&mut selector, (0.0, 0.0), (20.0, 20.0));

    selector.pointer_down(pos2(50.0, 50.0));
    selector.pointer_move(pos2(80.0, 90.0));
    {
        let surface = surface.borrow();
        let [committed, live] = surface.drawn.as_slice() else {
            panic!("expected committed + live, got {:?}", surface.drawn);
        };
        assert_eq!(committed.1, RectStyle::committed());
        assert_eq!(live.0, SurfaceRect::new(50, 50, 30, 40));
        assert_eq!(live.1, RectStyle::active());
    }

    selector.pointer_up(pos2(80.0, 90.0));
    let surface = surface.borrow();
    assert_eq!(surface.drawn.len(), 2);
    assert!(surface.drawn.iter().all(|(_, s)| *s == RectStyle::committed()));
}

#[test]
fn regions_scale_to_original_space() {
    let (mut selector, _, calls) = editable_selector(50, 50);
    selector.set_original_size(100, 100);

    drag(&mut selector, (5.0, 5.0), (30.0, 30.0));

    assert_eq!(selector.surface_regions(), [SurfaceRect::new(5, 5, 25, 25)]);
    assert_eq!(selector.regions(), [OriginalRect::new(10, 10, 50, 50)]);
    assert_eq!(*calls.borrow(), vec![vec![OriginalRect::new(10, 10, 50, 50)]]);
}

#[test]
fn regions_without_original_size_match_surface_regions() {
    let (mut selector, _, _) = editable_selector(64, 64);
    drag(&mut selector, (1.0, 2.0), (33.0, 44.0));

    let surface: Vec<_> = selector
        .surface_regions()
        .iter()
        .map(|r| OriginalRect::new(r.x, r.y, r.width, r.height))
        .collect();
    assert_eq!(selector.regions(), surface);
}

#[test]
fn set_regions_converts_from_original_space() {
    let (mut selector, _, calls) = editable_selector(50, 50);
    selector.set_original_size(100, 100);

    selector.set_regions([[10, 10, 50, 50]]);

    assert_eq!(selector.surface_regions(), [SurfaceRect::new(5, 5, 25, 25)]);
    assert_eq!(*calls.borrow(), vec![vec![OriginalRect::new(10, 10, 50, 50)]]);
}

#[test]
fn set_regions_accepts_corner_tuples() {
    let (mut selector, _, _) = editable_selector(100, 100);
    selector.set_original_size(100, 100);

    // Third value exceeds the original width: opposite-corner form.
    selector.set_regions([[10, 10, 150, 40]]);
    assert_eq!(selector.surface_regions(), [SurfaceRect::new(10, 10, 140, 30)]);
}

#[test]
fn set_regions_empty_clears_without_callback() {
    let (mut selector, surface, calls) = editable_selector(100, 100);
    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));
    assert_eq!(calls.borrow().len(), 1);

    // The silent clear is inherited behavior: replacement with a non-empty
    // list notifies, clearing does not.
    selector.set_regions(Vec::<[i32; 4]>::new());

    assert!(selector.surface_regions().is_empty());
    assert!(surface.borrow().drawn.is_empty());
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn set_regions_round_trips_through_regions() {
    let (mut selector, _, _) = editable_selector(50, 50);
    selector.set_original_size(100, 100);
    drag(&mut selector, (5.0, 5.0), (30.0, 30.0));
    drag(&mut selector, (12.0, 8.0), (40.0, 31.0));

    let before = selector.regions();
    selector.set_regions(before.clone());

    assert_eq!(selector.regions(), before);
    // Reapplying the round-tripped list changes nothing further.
    let surface_before = selector.surface_regions();
    selector.set_regions(before.clone());
    assert_eq!(selector.surface_regions(), surface_before);
}

#[test]
fn attach_id_resolves_through_registry() {
    let surface = TestSurface::new(100, 100);
    let mut registry = SurfaceRegistry::new();
    registry.insert("overlay", shared(&surface));

    let mut selector = RegionSelector::new();
    assert!(selector.attach_id(&registry, "overlay"));
    assert!(selector.is_attached());
}

#[test]
fn attach_unknown_id_leaves_binding_untouched() {
    let (mut selector, surface, _) = editable_selector(100, 100);
    let registry = SurfaceRegistry::new();

    assert!(!selector.attach_id(&registry, "missing"));

    // Still bound and editable: the failed attach changed nothing.
    assert!(selector.is_attached());
    assert!(selector.editing_enabled());
    assert!(surface.borrow().pointer_events);
    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));
    assert_eq!(selector.surface_regions().len(), 1);
}

#[test]
fn detach_preserves_rects_for_reattach() {
    let (mut selector, surface, _) = editable_selector(100, 100);
    selector.set_original_size(200, 200);
    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));

    selector.detach();
    assert!(!selector.is_attached());
    assert!(!surface.borrow().pointer_events);
    // Unbound: no usable surface dimensions, so numbers pass through.
    assert_eq!(selector.regions(), [OriginalRect::new(10, 10, 50, 50)]);

    let replacement = TestSurface::new(100, 100);
    selector.attach(shared(&replacement));
    let drawn = replacement.borrow().drawn.clone();
    assert_eq!(drawn, [(SurfaceRect::new(10, 10, 50, 50), RectStyle::committed())]);
}

#[test]
fn reattaching_same_surface_keeps_state_and_disables_editing() {
    let (mut selector, surface, _) = editable_selector(100, 100);
    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));

    selector.attach(shared(&surface));

    assert_eq!(selector.surface_regions().len(), 1);
    assert!(!selector.editing_enabled());
    assert!(!surface.borrow().pointer_events);
}

#[test]
fn attaching_new_surface_supplants_previous() {
    let (mut selector, first, _) = editable_selector(100, 100);
    let second = TestSurface::new(80, 80);

    selector.attach(shared(&second));

    assert!(!first.borrow().pointer_events);
    // Gestures now land on the second surface only.
    selector.enable_editing(true);
    drag(&mut selector, (0.0, 0.0), (20.0, 20.0));
    assert_eq!(second.borrow().drawn.len(), 1);
    assert_eq!(first.borrow().drawn.len(), 0);
}

#[test]
fn on_change_replaces_previous_listener() {
    let (mut selector, _, calls) = editable_selector(100, 100);

    let replacement_calls: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = replacement_calls.clone();
    selector.on_change(move |regions| sink.borrow_mut().push(regions.len()));

    drag(&mut selector, (10.0, 10.0), (60.0, 60.0));

    assert!(calls.borrow().is_empty());
    assert_eq!(*replacement_calls.borrow(), vec![1]);
}

#[test]
fn enable_editing_without_surface_is_a_no_op() {
    let mut selector = RegionSelector::new();
    selector.enable_editing(true);
    assert!(!selector.editing_enabled());
}

#[test]
fn set_original_size_zero_resets_to_identity() {
    let (mut selector, _, _) = editable_selector(50, 50);
    selector.set_original_size(100, 100);
    drag(&mut selector, (5.0, 5.0), (30.0, 30.0));
    assert_eq!(selector.regions(), [OriginalRect::new(10, 10, 50, 50)]);

    selector.set_original_size(0, 0);
    // Stored rectangles are untouched; only the interpretation changed.
    assert_eq!(selector.regions(), [OriginalRect::new(5, 5, 25, 25)]);
}
