//! The point-picker controller: one pick step at a time over live
//! viewports.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use vetro_exec::{Dispose, Interrupt, Operation, Teardown};
use vetro_snap::{
    AxisSnap, EdgeId, EdgeSnap, OrRestriction, PickerModel, PlaneSnap, Snap,
};

use crate::editor::Editor;
use crate::overlay::{OverlayId, OverlayObject};
use crate::viewport::{PointerButton, PointerEvent};

/// Context a resolved pick carries besides the point itself.
#[derive(Debug, Clone)]
pub struct PointInfo {
    /// The snap that won the pick.
    pub snap: Snap,
    /// The effective working plane at pick time.
    pub construction_plane: PlaneSnap,
}

/// One accepted (or tentative) pick. `info` is absent only when the step
/// was finished before the pointer ever moved.
#[derive(Debug, Clone)]
pub struct PointResult {
    pub point: Vec3,
    pub info: Option<PointInfo>,
}

/// How an external finish settles a pending pick step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickMode {
    /// Finish resolves with the last tentative point.
    #[default]
    ResolveOnFinish,
    /// Finish rejects with the finish interrupt; the idiom for terminating
    /// an open-ended pick loop.
    RejectOnFinish,
}

struct Pending {
    position: Vec3,
    info: Option<PointInfo>,
    hints: Vec<OverlayId>,
}

/// Interactive point acquisition over every live viewport.
///
/// The picker owns a [`PickerModel`] that persists across steps, so
/// restrictions and picked-point axes accumulate over a whole command.
/// Each [`PointPicker::execute`] call is one step: it arms pointer
/// listeners, draws the marker and hints, and settles on the first primary
/// press (or from outside through the operation's handle).
pub struct PointPicker {
    editor: Rc<Editor>,
    model: Rc<RefCell<PickerModel>>,
}

impl PointPicker {
    pub fn new(editor: Rc<Editor>) -> Self {
        let model = Rc::new(RefCell::new(PickerModel::new(editor.snap_config)));
        Self { editor, model }
    }

    pub fn model(&self) -> &Rc<RefCell<PickerModel>> {
        &self.model
    }

    // ---- model delegation ----------------------------------------------

    pub fn restrict_to_plane_through_point(&self, point: Vec3) {
        self.model.borrow_mut().restrict_to_plane_through_point(point);
    }

    pub fn restrict_to_plane(&self, plane: PlaneSnap) {
        self.model.borrow_mut().restrict_to_plane(plane);
    }

    pub fn restrict_to_construction_plane(&self, on: bool) {
        self.model.borrow_mut().restrict_to_construction_plane(on);
    }

    pub fn restrict_to_line(&self, origin: Vec3, direction: Vec3) {
        self.model.borrow_mut().restrict_to_line(origin, direction);
    }

    /// Restrict picks to the given edges, resolving curves through the
    /// geometry database. Unknown handles are skipped.
    pub fn restrict_to_edges(&self, edges: &[EdgeId]) -> Rc<OrRestriction> {
        let snaps: Vec<EdgeSnap> = edges
            .iter()
            .filter_map(|&edge| {
                let curve = self.editor.db.lookup_edge(edge);
                if curve.is_none() {
                    tracing::warn!(?edge, "edge not found in geometry database");
                }
                curve.map(|curve| EdgeSnap::new(edge, curve))
            })
            .collect();
        self.model.borrow_mut().restrict_to_edges(snaps)
    }

    pub fn add_snap(&self, snap: Snap) {
        self.model.borrow_mut().add_snap(snap);
    }

    pub fn add_axes_at(&self, point: Vec3, orientation: Quat) {
        self.model.borrow_mut().add_axes_at(point, orientation);
    }

    pub fn add_straight_snap(&self, axis: AxisSnap) {
        self.model.borrow_mut().add_straight_snap(axis);
    }

    pub fn remove_straight_snap(&self, axis: &AxisSnap) {
        self.model.borrow_mut().remove_straight_snap(axis);
    }

    pub fn clear_straight_snaps(&self) {
        self.model.borrow_mut().clear_straight_snaps();
    }

    /// Forget the most recent pick.
    pub fn undo(&self) {
        self.model.borrow_mut().undo();
        self.editor.signals.point_picker_changed.emit(&());
    }

    // ---- the pick step -------------------------------------------------

    /// Run one pick step. `step` observes every tentative point so callers
    /// can keep a live preview current; the operation resolves on the first
    /// primary press in any viewport.
    pub fn execute(
        &self,
        step: impl FnMut(&PointResult) + 'static,
        mode: PickMode,
    ) -> Operation<PointResult> {
        let editor = self.editor.clone();
        let model = self.model.clone();

        Operation::new(move |resolver| {
            let step = Rc::new(RefCell::new(step));
            let marker = editor.overlay.add(OverlayObject::Marker {
                position: Vec3::ZERO,
            });
            let pending = Rc::new(RefCell::new(Pending {
                position: Vec3::ZERO,
                info: None,
                hints: Vec::new(),
            }));
            let disposables: Rc<RefCell<Vec<Dispose>>> = Rc::new(RefCell::new(Vec::new()));

            {
                let overlay = editor.overlay.clone();
                let pending = pending.clone();
                disposables.borrow_mut().push(Dispose::new(move || {
                    for id in pending.borrow_mut().hints.drain(..) {
                        overlay.remove(id);
                    }
                    overlay.remove(marker);
                }));
            }

            for viewport in &editor.viewports {
                viewport.disable_controls();
                {
                    let viewport = viewport.clone();
                    disposables
                        .borrow_mut()
                        .push(Dispose::new(move || viewport.enable_controls()));
                }

                let subscription = {
                    let vp = viewport.clone();
                    let editor = editor.clone();
                    let model = model.clone();
                    let pending = pending.clone();
                    let step = step.clone();
                    let resolver = resolver.clone();
                    let disposables = disposables.clone();
                    viewport.pointer_events().connect(move |event| match *event {
                        PointerEvent::Moved { ray } => {
                            let base = vp.construction_plane();
                            let model = model.borrow();
                            let plane = model.effective_plane(base);

                            {
                                let mut pending = pending.borrow_mut();
                                for id in pending.hints.drain(..) {
                                    editor.overlay.remove(id);
                                }
                                for hit in model.nearby(&ray) {
                                    pending
                                        .hints
                                        .push(editor.overlay.add(OverlayObject::Hint(hit.hint)));
                                }
                            }

                            if let Some((snap, point)) = model.snap(&ray, base).into_iter().next()
                            {
                                let info = PointInfo {
                                    snap,
                                    construction_plane: plane,
                                };
                                let result = PointResult {
                                    point,
                                    info: Some(info.clone()),
                                };
                                (step.borrow_mut())(&result);
                                editor.overlay.set_position(marker, point);
                                let mut pending = pending.borrow_mut();
                                pending.position = point;
                                pending.info = Some(info);
                            }
                            drop(model);
                            editor.signals.point_picker_changed.emit(&());
                        }
                        PointerEvent::Pressed { button, .. } => {
                            if button != PointerButton::Primary {
                                return;
                            }
                            let (point, info) = {
                                let pending = pending.borrow();
                                (pending.position, pending.info.clone())
                            };
                            dispose_all(&disposables);
                            model.borrow_mut().add_picked_point(point);
                            resolver.resolve(PointResult { point, info });
                            editor.signals.point_picker_changed.emit(&());
                        }
                    })
                };
                disposables.borrow_mut().push(subscription);
            }

            let cancel = {
                let disposables = disposables.clone();
                let editor = editor.clone();
                let resolver = resolver.clone();
                Box::new(move || {
                    resolver.reject(Interrupt::Cancel);
                    dispose_all(&disposables);
                    editor.signals.point_picker_changed.emit(&());
                })
            };
            let finish = {
                let disposables = disposables.clone();
                let editor = editor.clone();
                let pending = pending.clone();
                let resolver = resolver.clone();
                Box::new(move || {
                    let (point, info) = {
                        let pending = pending.borrow();
                        (pending.position, pending.info.clone())
                    };
                    match mode {
                        PickMode::ResolveOnFinish => {
                            resolver.resolve(PointResult { point, info })
                        }
                        PickMode::RejectOnFinish => resolver.reject(Interrupt::Finish),
                    }
                    dispose_all(&disposables);
                    editor.signals.point_picker_changed.emit(&());
                })
            };
            Teardown { cancel, finish }
        })
    }
}

fn dispose_all(disposables: &Rc<RefCell<Vec<Dispose>>>) {
    for d in std::mem::take(&mut *disposables.borrow_mut()) {
        d.dispose();
    }
}
