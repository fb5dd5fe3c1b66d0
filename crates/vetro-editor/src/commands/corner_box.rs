//! Corner box: a diagonal on the working plane, then a height pick
//! restricted to the plane normal.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use glam::Vec3;
use vetro_exec::{Command, CommandBase, OpResult};
use vetro_snap::{AxisSnap, PlaneSnap};

use crate::editor::Editor;
use crate::factory::{Factory, PrimitiveParams};
use crate::picker::{PickMode, PointPicker};

pub struct CornerBoxCommand {
    editor: Rc<Editor>,
    base: Rc<CommandBase>,
}

impl CornerBoxCommand {
    pub fn new(editor: Rc<Editor>) -> Rc<Self> {
        Rc::new(Self {
            editor,
            base: CommandBase::new(),
        })
    }
}

impl Command for CornerBoxCommand {
    fn name(&self) -> &'static str {
        "corner-box"
    }

    fn base(&self) -> Rc<CommandBase> {
        self.base.clone()
    }

    fn execute(self: Rc<Self>) -> LocalBoxFuture<'static, OpResult<()>> {
        async move {
            let editor = self.editor.clone();
            let base = &self.base;

            let picker = PointPicker::new(editor.clone());
            let p1 = picker
                .execute(|_| {}, PickMode::ResolveOnFinish)
                .resource(base.registry())
                .await?
                .point;

            // The diagonal stays on the plane through the first corner.
            // Swap the principal straight snaps for the plane diagonals.
            picker.restrict_to_plane_through_point(p1);
            picker.remove_straight_snap(&AxisSnap::x());
            picker.remove_straight_snap(&AxisSnap::y());
            picker.remove_straight_snap(&AxisSnap::z());
            picker.add_straight_snap(AxisSnap::new(Vec3::new(1.0, 1.0, 0.0)));
            picker.add_straight_snap(AxisSnap::new(Vec3::new(1.0, -1.0, 0.0)));

            let rect = base.resource(Factory::new(editor.db.clone(), editor.signals.clone()));
            let diagonal = {
                let rect = rect.clone();
                picker
                    .execute(
                        move |result| {
                            if let Some(info) = &result.info {
                                rect.set_params(rect_outline(
                                    p1,
                                    result.point,
                                    info.construction_plane,
                                ));
                                rect.update();
                            }
                        },
                        PickMode::ResolveOnFinish,
                    )
                    .resource(base.registry())
                    .await?
            };
            rect.discard();

            let p2 = diagonal.point;
            let plane = diagonal
                .info
                .map(|info| info.construction_plane)
                .unwrap_or_default();

            let box_factory =
                base.resource(Factory::new(editor.db.clone(), editor.signals.clone()));
            let height_picker = PointPicker::new(editor.clone());
            height_picker.restrict_to_line(p2, plane.normal);
            {
                let preview = box_factory.clone();
                height_picker
                    .execute(
                        move |result| {
                            let height = (result.point - p2).dot(plane.normal);
                            preview.set_params(PrimitiveParams::CornerBox {
                                p1,
                                p2,
                                height,
                                plane,
                            });
                            preview.update();
                        },
                        PickMode::ResolveOnFinish,
                    )
                    .finally_(base.registry())
                    .await?;
            }

            box_factory.commit()?;
            Ok(())
        }
        .boxed_local()
    }
}

/// Rectangle outline spanned by two corners on `plane`, for the diagonal
/// phase preview.
fn rect_outline(p1: Vec3, p2: Vec3, plane: PlaneSnap) -> PrimitiveParams {
    let n = plane.normal;
    let mut u = Vec3::X - n * Vec3::X.dot(n);
    if u.length_squared() < 1e-4 {
        u = Vec3::Y - n * Vec3::Y.dot(n);
    }
    let u = u.normalize();
    let v = n.cross(u);

    let d = p2 - p1;
    let a = p1 + u * d.dot(u);
    let c = p1 + v * d.dot(v);
    PrimitiveParams::Polyline {
        points: vec![p1, a, p2, c],
        closed: true,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use vetro_snap::PlaneSnap;

    use super::*;

    #[test]
    fn test_rect_outline_spans_corners() {
        let params = rect_outline(
            Vec3::ZERO,
            Vec3::new(2.0, 3.0, 0.0),
            PlaneSnap::default(),
        );
        let PrimitiveParams::Polyline { points, closed } = params else {
            panic!("expected polyline");
        };
        assert!(closed);
        assert_eq!(points.len(), 4);
        assert!(points.contains(&Vec3::new(2.0, 0.0, 0.0)));
        assert!(points.contains(&Vec3::new(0.0, 3.0, 0.0)));
    }
}
