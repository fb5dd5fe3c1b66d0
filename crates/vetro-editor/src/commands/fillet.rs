//! Fillet: a dialog and a persistent drag gizmo drive a single commit.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use glam::Vec3;
use vetro_exec::{Command, CommandBase, OpError, OpResult};
use vetro_snap::EdgeId;

use crate::dialog::Dialog;
use crate::editor::Editor;
use crate::factory::{Factory, PrimitiveParams};
use crate::gizmo::{DragGizmo, GizmoMode};

#[derive(Debug, Clone, PartialEq)]
pub struct FilletParams {
    pub distance: f32,
}

impl Default for FilletParams {
    fn default() -> Self {
        Self { distance: 1.0 }
    }
}

pub struct FilletCommand {
    editor: Rc<Editor>,
    base: Rc<CommandBase>,
    edges: Vec<EdgeId>,
    dialog: Rc<Dialog<FilletParams>>,
}

impl FilletCommand {
    pub fn new(editor: Rc<Editor>, edges: Vec<EdgeId>) -> Rc<Self> {
        Rc::new(Self {
            editor,
            base: CommandBase::new(),
            edges,
            dialog: Dialog::new(FilletParams::default()),
        })
    }

    /// The parameter dialog, for the UI to bind widgets to.
    pub fn dialog(&self) -> Rc<Dialog<FilletParams>> {
        self.dialog.clone()
    }
}

impl Command for FilletCommand {
    fn name(&self) -> &'static str {
        "fillet"
    }

    fn base(&self) -> Rc<CommandBase> {
        self.base.clone()
    }

    fn execute(self: Rc<Self>) -> LocalBoxFuture<'static, OpResult<()>> {
        async move {
            let editor = self.editor.clone();
            let base = &self.base;
            let edges = self.edges.clone();

            let Some(&first) = edges.first() else {
                return Err(OpError::Validation("no edges selected".into()));
            };
            let curve = editor
                .db
                .lookup_edge(first)
                .ok_or_else(|| OpError::Validation("unknown edge".into()))?;

            let fillet = base.resource(Factory::new(editor.db.clone(), editor.signals.clone()));
            fillet.set_params(PrimitiveParams::Fillet {
                edges: edges.clone(),
                distance: self.dialog.params().distance,
            });
            fillet.update();

            // The dialog is the commit point; OK or dismiss ends the whole
            // command through the finished gate below.
            let dialog_op = {
                let fillet = fillet.clone();
                let edges = edges.clone();
                self.dialog
                    .execute(move |params: &FilletParams| {
                        fillet.set_params(PrimitiveParams::Fillet {
                            edges: edges.clone(),
                            distance: params.distance,
                        });
                        fillet.update();
                    })
                    .finally_(base.registry())
            };
            {
                let base = self.base.clone();
                dialog_op.then(move |result| match result {
                    Ok(_) => base.finish(),
                    Err(_) => base.cancel(),
                });
            }

            // Persistent distance gizmo at the edge midpoint; it feeds the
            // dialog and dies with the command.
            let normal = editor
                .viewports
                .first()
                .map(|v| v.construction_plane().normal)
                .unwrap_or(Vec3::Z);
            let gizmo = DragGizmo::new(editor.clone(), curve.point_at(0.5), normal);
            let _drag = {
                let dialog = self.dialog.clone();
                gizmo
                    .execute(
                        move |t| dialog.set(|p| p.distance = t.abs().max(1e-3)),
                        GizmoMode::Persistent,
                    )
                    .resource(base.registry())
            };

            base.finished().await?;
            fillet.commit()?;
            Ok(())
        }
        .boxed_local()
    }
}
