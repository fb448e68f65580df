use glam::Vec2;

/// Butterfly position in scene coordinates, fed by viewport pointer events.
///
/// While frozen (a sneeze sequence is running) moves are ignored, so the
/// butterfly holds still and the droplet origin is wherever it stopped.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    origin: Vec2,
    position: Vec2,
    frozen: bool,
}

impl PointerTracker {
    pub fn new(initial: Vec2) -> Self {
        Self {
            origin: Vec2::ZERO,
            position: initial,
            frozen: false,
        }
    }

    /// Viewport position of the play surface's top-left corner.
    pub fn set_surface_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn surface_origin(&self) -> Vec2 {
        self.origin
    }

    pub fn to_scene(&self, viewport: Vec2) -> Vec2 {
        viewport - self.origin
    }

    /// Returns whether the position changed.
    pub fn on_move(&mut self, viewport: Vec2) -> bool {
        if self.frozen {
            return false;
        }
        let scene = self.to_scene(viewport);
        if scene == self.position {
            return false;
        }
        self.position = scene;
        true
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Back to `initial`, unfrozen. The surface origin is kept.
    pub fn reset(&mut self, initial: Vec2) {
        self.position = initial;
        self.frozen = false;
    }
}

/// Strictly closer than `radius` to `target`. No target, never near.
pub fn is_near(pointer: Vec2, target: Option<Vec2>, radius: f32) -> bool {
    target.is_some_and(|t| pointer.distance(t) < radius)
}

/// Inside the axis-aligned square of side `size` centred on `center`.
pub fn hits_square(point: Vec2, center: Vec2, size: f32) -> bool {
    let half = size * 0.5;
    let d = (point - center).abs();
    d.x <= half && d.y <= half
}
