//! Headless editor harness for driving commands programmatically.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;
use uuid::Uuid;
use vetro_exec::{CommandRunner, OpResult};
use vetro_snap::{EdgeCurve, EdgeId, PlaneSnap, Ray, SnapConfig};

use crate::db::{GeometryDb, ItemId, TempId};
use crate::editor::Editor;
use crate::factory::PrimitiveParams;
use crate::overlay::{OverlayId, OverlayObject, SceneOverlay};
use crate::signal::{EditorSignals, Signal};
use crate::viewport::{PointerButton, PointerEvent, Viewport};

/// Scriptable viewport: emits pointer events on demand and counts
/// navigation locks.
pub struct TestViewport {
    plane: Cell<PlaneSnap>,
    events: Signal<PointerEvent>,
    lock_depth: Cell<u32>,
}

impl TestViewport {
    pub fn new(plane: PlaneSnap) -> Rc<Self> {
        Rc::new(Self {
            plane: Cell::new(plane),
            events: Signal::new(),
            lock_depth: Cell::new(0),
        })
    }

    pub fn set_plane(&self, plane: PlaneSnap) {
        self.plane.set(plane);
    }

    pub fn move_pointer(&self, ray: Ray) {
        self.events.emit(&PointerEvent::Moved { ray });
    }

    pub fn press(&self, ray: Ray, button: PointerButton) {
        self.events.emit(&PointerEvent::Pressed { ray, button });
    }

    /// A move followed by a primary press, like a real click.
    pub fn click(&self, ray: Ray) {
        self.move_pointer(ray);
        self.press(ray, PointerButton::Primary);
    }

    pub fn controls_enabled(&self) -> bool {
        self.lock_depth.get() == 0
    }
}

impl Viewport for TestViewport {
    fn construction_plane(&self) -> PlaneSnap {
        self.plane.get()
    }

    fn pointer_events(&self) -> &Signal<PointerEvent> {
        &self.events
    }

    fn disable_controls(&self) {
        self.lock_depth.set(self.lock_depth.get() + 1);
    }

    fn enable_controls(&self) {
        self.lock_depth.set(self.lock_depth.get().saturating_sub(1));
    }
}

/// Records overlay objects in a map for inspection.
#[derive(Default)]
pub struct TestOverlay {
    objects: RefCell<HashMap<OverlayId, OverlayObject>>,
}

impl TestOverlay {
    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }

    /// Position of the pick marker, if one is live.
    pub fn marker_position(&self) -> Option<Vec3> {
        self.objects.borrow().values().find_map(|o| match o {
            OverlayObject::Marker { position } => Some(*position),
            OverlayObject::Hint(_) => None,
        })
    }

    pub fn hint_count(&self) -> usize {
        self.objects
            .borrow()
            .values()
            .filter(|o| matches!(o, OverlayObject::Hint(_)))
            .count()
    }
}

impl SceneOverlay for TestOverlay {
    fn add(&self, object: OverlayObject) -> OverlayId {
        let id = OverlayId::new();
        self.objects.borrow_mut().insert(id, object);
        id
    }

    fn set_position(&self, id: OverlayId, position: Vec3) {
        if let Some(OverlayObject::Marker { position: p }) = self.objects.borrow_mut().get_mut(&id)
        {
            *p = position;
        }
    }

    fn remove(&self, id: OverlayId) {
        self.objects.borrow_mut().remove(&id);
    }
}

/// In-memory geometry database.
#[derive(Default)]
pub struct TestDb {
    edges: RefCell<HashMap<EdgeId, EdgeCurve>>,
    temporaries: RefCell<HashMap<TempId, PrimitiveParams>>,
    committed: RefCell<Vec<(ItemId, PrimitiveParams)>>,
}

impl TestDb {
    pub fn insert_edge(&self, edge: EdgeId, curve: EdgeCurve) {
        self.edges.borrow_mut().insert(edge, curve);
    }

    pub fn temporary_count(&self) -> usize {
        self.temporaries.borrow().len()
    }

    pub fn committed(&self) -> Vec<PrimitiveParams> {
        self.committed
            .borrow()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl GeometryDb for TestDb {
    fn lookup_edge(&self, edge: EdgeId) -> Option<EdgeCurve> {
        self.edges.borrow().get(&edge).cloned()
    }

    fn upsert_temporary(&self, id: TempId, params: &PrimitiveParams) {
        self.temporaries.borrow_mut().insert(id, params.clone());
    }

    fn remove_temporary(&self, id: TempId) {
        self.temporaries.borrow_mut().remove(&id);
    }

    fn commit(&self, params: &PrimitiveParams) -> OpResult<ItemId> {
        let item = ItemId(Uuid::new_v4());
        self.committed.borrow_mut().push((item, params.clone()));
        Ok(item)
    }
}

/// One-viewport headless editor plus a command runner.
pub struct TestEditor {
    pub editor: Rc<Editor>,
    pub viewport: Rc<TestViewport>,
    pub overlay: Rc<TestOverlay>,
    pub db: Rc<TestDb>,
    pub runner: CommandRunner,
}

impl TestEditor {
    /// XY construction plane through the origin, default tolerances.
    pub fn new() -> Self {
        let viewport = TestViewport::new(PlaneSnap::default());
        let overlay = Rc::new(TestOverlay::default());
        let db = Rc::new(TestDb::default());
        let editor = Rc::new(Editor {
            db: db.clone(),
            viewports: vec![viewport.clone() as Rc<dyn Viewport>],
            overlay: overlay.clone(),
            signals: Rc::new(EditorSignals::default()),
            snap_config: SnapConfig::default(),
        });
        Self {
            editor,
            viewport,
            overlay,
            db,
            runner: CommandRunner::new(),
        }
    }

    /// Ray looking straight down at an XY target.
    pub fn ray_to(target: Vec3) -> Ray {
        Ray::new(target + Vec3::Z * 10.0, Vec3::NEG_Z)
    }

    pub fn move_to(&self, target: Vec3) {
        self.viewport.move_pointer(Self::ray_to(target));
        self.runner.pump();
    }

    pub fn click_at(&self, target: Vec3) {
        self.viewport.click(Self::ray_to(target));
        self.runner.pump();
    }
}

impl Default for TestEditor {
    fn default() -> Self {
        Self::new()
    }
}
