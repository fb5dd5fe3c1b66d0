//! Polyline: picks accumulate until the user finishes the command.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use glam::Vec3;
use vetro_exec::{Command, CommandBase, OpResult};

use crate::editor::Editor;
use crate::factory::{Factory, PrimitiveParams};
use crate::picker::{PickMode, PointPicker};

pub struct PolylineCommand {
    editor: Rc<Editor>,
    base: Rc<CommandBase>,
}

impl PolylineCommand {
    pub fn new(editor: Rc<Editor>) -> Rc<Self> {
        Rc::new(Self {
            editor,
            base: CommandBase::new(),
        })
    }
}

impl Command for PolylineCommand {
    fn name(&self) -> &'static str {
        "polyline"
    }

    fn base(&self) -> Rc<CommandBase> {
        self.base.clone()
    }

    fn execute(self: Rc<Self>) -> LocalBoxFuture<'static, OpResult<()>> {
        async move {
            let editor = self.editor.clone();
            let base = &self.base;

            let curve = base.resource(Factory::new(editor.db.clone(), editor.signals.clone()));
            let picker = PointPicker::new(editor.clone());
            let points: Rc<RefCell<Vec<Vec3>>> = Rc::new(RefCell::new(Vec::new()));

            loop {
                // The in-flight pick is the command's commit point; finish
                // must reach it as finish so the loop can terminate.
                let op = {
                    let preview = curve.clone();
                    let points = points.clone();
                    picker
                        .execute(
                            move |result| {
                                let mut all = points.borrow().clone();
                                all.push(result.point);
                                if all.len() >= 2 {
                                    preview.set_params(PrimitiveParams::Polyline {
                                        points: all,
                                        closed: false,
                                    });
                                    preview.update();
                                }
                            },
                            PickMode::RejectOnFinish,
                        )
                        .finally_(base.registry())
                };
                match op.await {
                    Ok(result) => points.borrow_mut().push(result.point),
                    Err(e) if e.is_finish() => break,
                    Err(e) => return Err(e),
                }
            }

            curve.set_params(PrimitiveParams::Polyline {
                points: points.borrow().clone(),
                closed: false,
            });
            curve.commit()?;
            Ok(())
        }
        .boxed_local()
    }
}
