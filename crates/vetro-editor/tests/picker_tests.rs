//! Point-picker controller behavior against the headless harness.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use vetro_editor::editor::Editor;
use vetro_editor::harness::{TestDb, TestEditor, TestOverlay, TestViewport};
use vetro_editor::picker::{PickMode, PointPicker, PointResult};
use vetro_editor::signal::EditorSignals;
use vetro_editor::viewport::Viewport;
use vetro_exec::{Cancellable, OpResult};
use vetro_snap::{EdgeCurve, EdgeId, PlaneSnap, PointSnap, Snap, SnapConfig};

type Captured = Rc<RefCell<Option<OpResult<PointResult>>>>;

fn capture(op: vetro_exec::Operation<PointResult>) -> Captured {
    let out: Captured = Rc::new(RefCell::new(None));
    let o = out.clone();
    op.then(move |result| *o.borrow_mut() = Some(result));
    out
}

#[test]
fn test_click_resolves_point_on_construction_plane() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let out = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    assert!(!h.viewport.controls_enabled());
    assert_eq!(h.overlay.object_count(), 1); // the marker

    h.viewport.click(TestEditor::ray_to(Vec3::new(3.0, 3.0, 0.0)));

    let result = out.borrow_mut().take().expect("settled").expect("resolved");
    assert_eq!(result.point, Vec3::new(3.0, 3.0, 0.0));
    assert!(result.info.is_some());
    assert!(h.overlay.is_empty());
    assert!(h.viewport.controls_enabled());
    assert_eq!(picker.model().borrow().pick_count(), 1);
}

#[test]
fn test_marker_and_hints_track_pointer() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());
    picker.add_snap(Snap::Point(PointSnap::new(Vec3::new(1.0, 0.0, 0.0))));

    let _out = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    h.viewport
        .move_pointer(TestEditor::ray_to(Vec3::new(1.05, 0.0, 0.0)));

    // Marker snapped to the exact point, one hint for the point snap.
    assert_eq!(h.overlay.marker_position(), Some(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(h.overlay.hint_count(), 1);

    // Out of hint range again: hints disappear, marker tracks the plane.
    h.viewport
        .move_pointer(TestEditor::ray_to(Vec3::new(5.0, 5.0, 0.0)));
    assert_eq!(h.overlay.hint_count(), 0);
    assert_eq!(h.overlay.marker_position(), Some(Vec3::new(5.0, 5.0, 0.0)));
}

#[test]
fn test_any_viewport_can_produce_the_point() {
    let first = TestViewport::new(PlaneSnap::default());
    let second = TestViewport::new(PlaneSnap::default());
    let overlay = Rc::new(TestOverlay::default());
    let db = Rc::new(TestDb::default());
    let editor = Rc::new(Editor {
        db: db.clone(),
        viewports: vec![
            first.clone() as Rc<dyn Viewport>,
            second.clone() as Rc<dyn Viewport>,
        ],
        overlay: overlay.clone(),
        signals: Rc::new(EditorSignals::default()),
        snap_config: SnapConfig::default(),
    });
    let picker = PointPicker::new(editor);

    let out = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    assert!(!first.controls_enabled());
    assert!(!second.controls_enabled());

    // A click in the second viewport settles the step for both.
    second.click(TestEditor::ray_to(Vec3::new(2.0, 1.0, 0.0)));

    let result = out.borrow_mut().take().expect("settled").expect("resolved");
    assert_eq!(result.point, Vec3::new(2.0, 1.0, 0.0));
    assert!(first.controls_enabled());
    assert!(second.controls_enabled());
    assert!(overlay.is_empty());

    // Listeners in the other viewport are gone too.
    first.click(TestEditor::ray_to(Vec3::ZERO));
    assert_eq!(picker.model().borrow().pick_count(), 1);
}

#[test]
fn test_step_callback_streams_tentative_points() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let seen: Rc<RefCell<Vec<Vec3>>> = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _out = capture(picker.execute(
        move |result| s.borrow_mut().push(result.point),
        PickMode::ResolveOnFinish,
    ));

    h.viewport.move_pointer(TestEditor::ray_to(Vec3::X));
    h.viewport.move_pointer(TestEditor::ray_to(Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(
        *seen.borrow(),
        vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]
    );
}

#[test]
fn test_cancel_tears_down_and_rejects() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let op = picker.execute(|_| {}, PickMode::ResolveOnFinish);
    let handle = op.handle();
    let out = capture(op);

    handle.cancel();
    assert!(out.borrow().as_ref().expect("settled").is_err());
    assert!(h.overlay.is_empty());
    assert!(h.viewport.controls_enabled());

    // Listeners are gone: a later click changes nothing.
    h.viewport.click(TestEditor::ray_to(Vec3::ZERO));
    assert_eq!(picker.model().borrow().pick_count(), 0);
}

#[test]
fn test_finish_resolves_last_tentative_point() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let op = picker.execute(|_| {}, PickMode::ResolveOnFinish);
    let handle = op.handle();
    let out = capture(op);

    h.viewport
        .move_pointer(TestEditor::ray_to(Vec3::new(2.0, 1.0, 0.0)));
    handle.finish();

    let result = out.borrow_mut().take().expect("settled").expect("resolved");
    assert_eq!(result.point, Vec3::new(2.0, 1.0, 0.0));
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_finish_rejects_in_reject_mode() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let op = picker.execute(|_| {}, PickMode::RejectOnFinish);
    let handle = op.handle();
    let out = capture(op);

    h.viewport.move_pointer(TestEditor::ray_to(Vec3::X));
    handle.finish();

    let err = out
        .borrow_mut()
        .take()
        .expect("settled")
        .expect_err("rejected");
    assert!(err.is_finish());
    assert!(h.overlay.is_empty());
}

#[test]
fn test_second_pick_snaps_to_axes_of_first() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let _first = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    h.viewport.click(TestEditor::ray_to(Vec3::new(1.0, 1.0, 0.0)));

    let out = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    // Slightly off the X axis through (1,1,0): the axis wins and squares
    // the point up.
    h.viewport.click(TestEditor::ray_to(Vec3::new(5.0, 1.03, 0.0)));

    let result = out.borrow_mut().take().expect("settled").expect("resolved");
    assert!((result.point.y - 1.0).abs() < 1e-5);
    assert!((result.point.x - 5.0).abs() < 1e-5);
}

#[test]
fn test_plane_restriction_flattens_spatial_snap() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());
    picker.add_snap(Snap::Point(PointSnap::new(Vec3::new(3.0, 3.0, 5.0))));
    picker.restrict_to_plane_through_point(Vec3::ZERO);

    let out = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    h.viewport.click(TestEditor::ray_to(Vec3::new(3.0, 3.0, 5.0)));

    let result = out.borrow_mut().take().expect("settled").expect("resolved");
    assert_eq!(result.point, Vec3::new(3.0, 3.0, 0.0));
}

#[test]
fn test_restrict_to_edges_reports_matched_edge() {
    let h = TestEditor::new();
    let solid = uuid::Uuid::new_v4();
    let e0 = EdgeId::new(solid, 0);
    let e1 = EdgeId::new(solid, 1);
    h.db.insert_edge(
        e0,
        EdgeCurve::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
    );
    h.db.insert_edge(
        e1,
        EdgeCurve::new(vec![Vec3::new(0.0, 5.0, 0.0), Vec3::new(4.0, 5.0, 0.0)]),
    );

    let picker = PointPicker::new(h.editor.clone());
    let or = picker.restrict_to_edges(&[e0, e1]);

    let out = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    h.viewport.click(TestEditor::ray_to(Vec3::new(1.0, 4.7, 0.0)));

    let result = out.borrow_mut().take().expect("settled").expect("resolved");
    assert_eq!(result.point, Vec3::new(1.0, 5.0, 0.0));
    let (matched, t) = or.matched().expect("landed on an edge");
    assert_eq!(matched, e1);
    assert!((t - 0.25).abs() < 1e-5);
}

#[test]
fn test_undo_drops_last_pick_and_notifies() {
    let h = TestEditor::new();
    let picker = PointPicker::new(h.editor.clone());

    let changed = Rc::new(RefCell::new(0));
    let c = changed.clone();
    let _sub = h
        .editor
        .signals
        .point_picker_changed
        .connect(move |_| *c.borrow_mut() += 1);

    let _a = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    h.viewport.click(TestEditor::ray_to(Vec3::ZERO));
    let _b = capture(picker.execute(|_| {}, PickMode::ResolveOnFinish));
    h.viewport.click(TestEditor::ray_to(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(picker.model().borrow().pick_count(), 2);

    let before = *changed.borrow();
    picker.undo();
    assert_eq!(picker.model().borrow().pick_count(), 1);
    assert_eq!(*changed.borrow(), before + 1);
}
