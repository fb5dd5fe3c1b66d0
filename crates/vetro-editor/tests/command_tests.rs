//! End-to-end command flows through the runner and headless harness.

use glam::Vec3;
use vetro_editor::commands::{CornerBoxCommand, FilletCommand, PolylineCommand, SphereCommand};
use vetro_editor::factory::PrimitiveParams;
use vetro_editor::harness::TestEditor;
use vetro_snap::{EdgeCurve, EdgeId, Ray};

#[test]
fn test_sphere_command_commits_picked_radius() {
    let h = TestEditor::new();
    h.runner.run(SphereCommand::new(h.editor.clone()));

    h.click_at(Vec3::ZERO);
    h.move_to(Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(h.db.temporary_count(), 1); // live preview

    h.click_at(Vec3::new(3.0, 0.0, 0.0));

    assert_eq!(
        h.db.committed(),
        vec![PrimitiveParams::Sphere {
            center: Vec3::ZERO,
            radius: 3.0,
        }]
    );
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.overlay.is_empty());
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_sphere_command_finish_accepts_tentative_radius() {
    let h = TestEditor::new();
    h.runner.run(SphereCommand::new(h.editor.clone()));

    h.click_at(Vec3::ZERO);
    h.move_to(Vec3::new(2.0, 0.0, 0.0));
    h.runner.finish_active();

    assert_eq!(
        h.db.committed(),
        vec![PrimitiveParams::Sphere {
            center: Vec3::ZERO,
            radius: 2.0,
        }]
    );
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_cancel_mid_command_removes_preview() {
    let h = TestEditor::new();
    h.runner.run(SphereCommand::new(h.editor.clone()));

    h.click_at(Vec3::ZERO);
    h.move_to(Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(h.db.temporary_count(), 1);

    h.runner.cancel_active();

    assert!(h.db.committed().is_empty());
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.overlay.is_empty());
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_degenerate_sphere_aborts_without_commit() {
    let h = TestEditor::new();
    h.runner.run(SphereCommand::new(h.editor.clone()));

    // Radius pick lands on the center: zero radius fails commit validation
    // and the command unwinds cleanly.
    h.click_at(Vec3::ZERO);
    h.click_at(Vec3::ZERO);

    assert!(h.db.committed().is_empty());
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_polyline_accumulates_until_finished() {
    let h = TestEditor::new();
    h.runner.run(PolylineCommand::new(h.editor.clone()));

    h.click_at(Vec3::ZERO);
    h.click_at(Vec3::new(2.0, 0.0, 0.0));
    h.click_at(Vec3::new(2.0, 1.0, 0.0));
    h.runner.finish_active();

    assert_eq!(
        h.db.committed(),
        vec![PrimitiveParams::Polyline {
            points: vec![
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 1.0, 0.0),
            ],
            closed: false,
        }]
    );
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_polyline_cancel_discards_everything() {
    let h = TestEditor::new();
    h.runner.run(PolylineCommand::new(h.editor.clone()));

    h.click_at(Vec3::ZERO);
    h.click_at(Vec3::new(1.0, 0.0, 0.0));
    h.move_to(Vec3::new(1.0, 2.0, 0.0));
    assert_eq!(h.db.temporary_count(), 1);

    h.runner.cancel_active();

    assert!(h.db.committed().is_empty());
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_corner_box_command() {
    let h = TestEditor::new();
    h.runner.run(CornerBoxCommand::new(h.editor.clone()));

    h.click_at(Vec3::ZERO);
    h.click_at(Vec3::new(2.0, 3.0, 0.0));

    // Height phase is restricted to the vertical through the second
    // corner; drag sideways with a horizontal ray.
    let ray = Ray::new(Vec3::new(10.0, 3.0, 1.5), Vec3::NEG_X);
    h.viewport.click(ray);
    h.runner.pump();

    let committed = h.db.committed();
    assert_eq!(committed.len(), 1);
    let PrimitiveParams::CornerBox { p1, p2, height, .. } = &committed[0] else {
        panic!("expected a corner box");
    };
    assert_eq!(*p1, Vec3::ZERO);
    assert_eq!(*p2, Vec3::new(2.0, 3.0, 0.0));
    assert!((height - 1.5).abs() < 1e-5);
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_fillet_command_dialog_drives_commit() {
    let h = TestEditor::new();
    let edge = EdgeId::new(uuid::Uuid::new_v4(), 0);
    h.db.insert_edge(
        edge,
        EdgeCurve::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
    );

    let command = FilletCommand::new(h.editor.clone(), vec![edge]);
    let dialog = command.dialog();
    h.runner.run(command);
    assert_eq!(h.db.temporary_count(), 1); // initial preview

    dialog.set(|p| p.distance = 2.5);
    dialog.ok();
    h.runner.pump();

    assert_eq!(
        h.db.committed(),
        vec![PrimitiveParams::Fillet {
            edges: vec![edge],
            distance: 2.5,
        }]
    );
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_fillet_dialog_dismiss_cancels() {
    let h = TestEditor::new();
    let edge = EdgeId::new(uuid::Uuid::new_v4(), 0);
    h.db.insert_edge(
        edge,
        EdgeCurve::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
    );

    let command = FilletCommand::new(h.editor.clone(), vec![edge]);
    let dialog = command.dialog();
    h.runner.run(command);

    dialog.dismiss();
    h.runner.pump();

    assert!(h.db.committed().is_empty());
    assert_eq!(h.db.temporary_count(), 0);
    assert!(h.viewport.controls_enabled());
}

#[test]
fn test_starting_a_command_cancels_the_active_one() {
    let h = TestEditor::new();
    h.runner.run(SphereCommand::new(h.editor.clone()));
    h.click_at(Vec3::ZERO);
    h.move_to(Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(h.db.temporary_count(), 1);

    h.runner.run(PolylineCommand::new(h.editor.clone()));
    assert_eq!(h.db.temporary_count(), 0); // sphere preview gone

    h.click_at(Vec3::ZERO);
    h.click_at(Vec3::new(1.0, 1.0, 0.0));
    h.runner.finish_active();

    assert_eq!(h.db.committed().len(), 1);
    assert!(matches!(
        h.db.committed()[0],
        PrimitiveParams::Polyline { .. }
    ));
}
