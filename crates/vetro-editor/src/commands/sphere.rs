//! Sphere: center pick, then a radius pick with live preview.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use vetro_exec::{Command, CommandBase, OpResult};

use crate::editor::Editor;
use crate::factory::{Factory, PrimitiveParams};
use crate::picker::{PickMode, PointPicker};

pub struct SphereCommand {
    editor: Rc<Editor>,
    base: Rc<CommandBase>,
}

impl SphereCommand {
    pub fn new(editor: Rc<Editor>) -> Rc<Self> {
        Rc::new(Self {
            editor,
            base: CommandBase::new(),
        })
    }
}

impl Command for SphereCommand {
    fn name(&self) -> &'static str {
        "sphere"
    }

    fn base(&self) -> Rc<CommandBase> {
        self.base.clone()
    }

    fn execute(self: Rc<Self>) -> LocalBoxFuture<'static, OpResult<()>> {
        async move {
            let editor = self.editor.clone();
            let base = &self.base;

            let sphere = base.resource(Factory::new(editor.db.clone(), editor.signals.clone()));
            let picker = PointPicker::new(editor.clone());

            let center = picker
                .execute(|_| {}, PickMode::ResolveOnFinish)
                .resource(base.registry())
                .await?
                .point;

            // The radius pick is the command's commit point: Enter accepts
            // the tentative radius.
            let preview = sphere.clone();
            picker
                .execute(
                    move |result| {
                        preview.set_params(PrimitiveParams::Sphere {
                            center,
                            radius: center.distance(result.point),
                        });
                        preview.update();
                    },
                    PickMode::ResolveOnFinish,
                )
                .finally_(base.registry())
                .await?;

            sphere.commit()?;
            Ok(())
        }
        .boxed_local()
    }
}
