//! The editor aggregate handed to controllers and commands.

use std::rc::Rc;

use vetro_snap::SnapConfig;

use crate::db::GeometryDb;
use crate::overlay::SceneOverlay;
use crate::signal::EditorSignals;
use crate::viewport::Viewport;

/// Shared collaborators of the interactive layer.
///
/// Commands and controllers receive an `Rc<Editor>` and reach everything
/// through it; none of them own a viewport or the database.
pub struct Editor {
    pub db: Rc<dyn GeometryDb>,
    pub viewports: Vec<Rc<dyn Viewport>>,
    pub overlay: Rc<dyn SceneOverlay>,
    pub signals: Rc<EditorSignals>,
    pub snap_config: SnapConfig,
}
