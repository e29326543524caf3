use glam::{Mat4, Vec2};
use texel_engine::input::{InputFrame, InputState, Key};

/// Units per second, clip space.
pub const MOVE_SPEED: f32 = 0.8;
/// Radians per second.
pub const TURN_SPEED: f32 = 1.5;
/// Opacity change per second.
pub const FADE_SPEED: f32 = 0.5;

pub const INITIAL_OPACITY: f32 = 0.6;
const OFFSET_LIMIT: f32 = 1.0;

/// Keyboard-accumulated placement of the front triangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlendControls {
    pub offset: Vec2,
    pub angle: f32,
    pub opacity: f32,
}

impl Default for BlendControls {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            angle: 0.0,
            opacity: INITIAL_OPACITY,
        }
    }
}

impl BlendControls {
    /// Integrates held keys over `dt` seconds. R pressed this frame resets.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        if frame.pressed(Key::R) {
            *self = Self::default();
            log::debug!("controls reset");
            return;
        }

        let dir = Vec2::new(
            input.axis(Key::ArrowLeft, Key::ArrowRight),
            input.axis(Key::ArrowDown, Key::ArrowUp),
        );
        self.offset = (self.offset + dir * MOVE_SPEED * dt).clamp(
            Vec2::splat(-OFFSET_LIMIT),
            Vec2::splat(OFFSET_LIMIT),
        );

        self.angle = (self.angle + input.axis(Key::E, Key::Q) * TURN_SPEED * dt)
            .rem_euclid(std::f32::consts::TAU);

        let fade = input.axis(Key::S, Key::W);
        if fade != 0.0 {
            self.opacity = (self.opacity + fade * FADE_SPEED * dt).clamp(0.0, 1.0);
        }
    }

    /// Rotation about the origin, then translation by `offset`.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.offset.extend(0.0)) * Mat4::from_rotation_z(self.angle)
    }
}
