//! Axis-drag gizmo: streams a signed magnitude along a direction.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec3;
use vetro_exec::{Dispose, Interrupt, Operation, Teardown};

use crate::editor::Editor;
use crate::viewport::{PointerButton, PointerEvent};

/// Whether a gizmo settles itself on click or lives until the command ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoMode {
    /// Resolve on the first primary press.
    Transient,
    /// Ignore presses; only external finish or cancel settles the
    /// operation. Used for gizmos that stay live while a dialog is open.
    Persistent,
}

/// A draggable handle along one axis. The dragged value is the signed
/// distance from `origin` along `direction` of the pointer ray's closest
/// approach.
pub struct DragGizmo {
    editor: Rc<Editor>,
    pub origin: Vec3,
    pub direction: Vec3,
}

impl DragGizmo {
    pub fn new(editor: Rc<Editor>, origin: Vec3, direction: Vec3) -> Self {
        Self {
            editor,
            origin,
            direction: direction.normalize(),
        }
    }

    /// Stream drag magnitudes through `step`.
    pub fn execute(&self, step: impl FnMut(f32) + 'static, mode: GizmoMode) -> Operation<f32> {
        let editor = self.editor.clone();
        let origin = self.origin;
        let direction = self.direction;

        Operation::new(move |resolver| {
            let step = Rc::new(RefCell::new(step));
            let current = Rc::new(Cell::new(0.0f32));
            let disposables: Rc<RefCell<Vec<Dispose>>> = Rc::new(RefCell::new(Vec::new()));

            for viewport in &editor.viewports {
                viewport.disable_controls();
                {
                    let viewport = viewport.clone();
                    disposables
                        .borrow_mut()
                        .push(Dispose::new(move || viewport.enable_controls()));
                }

                let subscription = {
                    let step = step.clone();
                    let current = current.clone();
                    let resolver = resolver.clone();
                    let disposables = disposables.clone();
                    viewport.pointer_events().connect(move |event| match *event {
                        PointerEvent::Moved { ray } => {
                            let (t, _) = ray.closest_on_line(origin, direction);
                            current.set(t);
                            (step.borrow_mut())(t);
                        }
                        PointerEvent::Pressed { button, .. } => {
                            if mode == GizmoMode::Transient && button == PointerButton::Primary {
                                resolver.resolve(current.get());
                                dispose_all(&disposables);
                            }
                        }
                    })
                };
                disposables.borrow_mut().push(subscription);
            }

            let cancel = {
                let disposables = disposables.clone();
                let resolver = resolver.clone();
                Box::new(move || {
                    resolver.reject(Interrupt::Cancel);
                    dispose_all(&disposables);
                })
            };
            let finish = {
                let disposables = disposables.clone();
                let current = current.clone();
                let resolver = resolver.clone();
                Box::new(move || {
                    resolver.resolve(current.get());
                    dispose_all(&disposables);
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
