/// Displacement, in device-independent pixels, at which a pressed pointer
/// becomes a drag rather than a click in progress.
pub const DRAG_START_DISTANCE_PX: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pressed,
    Dragging,
}

/// Incremental pan distance reported while a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDelta {
    pub dx: f64,
    pub dy: f64,
}

/// How a pointer-up resolves the gesture it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The pointer never travelled far enough to drag; the press counts as
    /// a click.
    Click,
    /// A drag ended; the caller must suppress the click the platform will
    /// synthesize from the same press/release pair.
    Drag,
    /// An up with no matching down.
    Ignored,
}

/// Disambiguates clicks from drags over a raw pointer event stream.
///
/// One press/release cycle yields exactly one semantic action: either a
/// click or a sequence of drag deltas. The anchor point re-bases on every
/// emitted delta, so deltas are incremental and their sum over a gesture
/// equals the pointer's net displacement.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    phase: Phase,
    anchor_x: f64,
    anchor_y: f64,
}

impl DragTracker {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }

    /// A down while a gesture is already in flight restarts the gesture;
    /// the stale press produced no action and never will.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) {
        self.phase = Phase::Pressed;
        self.anchor_x = x;
        self.anchor_y = y;
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Option<DragDelta> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pressed => {
                let dx = x - self.anchor_x;
                let dy = y - self.anchor_y;
                if (dx * dx + dy * dy).sqrt() < DRAG_START_DISTANCE_PX {
                    return None;
                }
                self.phase = Phase::Dragging;
                self.rebase(x, y);
                Some(DragDelta { dx, dy })
            }
            Phase::Dragging => {
                let dx = x - self.anchor_x;
                let dy = y - self.anchor_y;
                self.rebase(x, y);
                Some(DragDelta { dx, dy })
            }
        }
    }

    /// Ends the gesture and returns how it resolved. Always leaves the
    /// tracker idle, so the same release can never both suppress a click
    /// and leak state into the next gesture.
    pub fn on_pointer_up(&mut self) -> Release {
        let release = match self.phase {
            Phase::Idle => Release::Ignored,
            Phase::Pressed => Release::Click,
            Phase::Dragging => Release::Drag,
        };
        self.phase = Phase::Idle;
        release
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    fn rebase(&mut self, x: f64, y: f64) {
        self.anchor_x = x;
        self.anchor_y = y;
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new()
    }
}
