use texel_engine::render::TexturedVertex;

/// Opaque triangle, left of center. Clip-space positions.
pub const BACK_TRIANGLE: [TexturedVertex; 3] = [
    TexturedVertex::new([-0.8, -0.6, 0.0], [0.0, 1.0]),
    TexturedVertex::new([0.4, -0.6, 0.0], [1.0, 1.0]),
    TexturedVertex::new([-0.2, 0.7, 0.0], [0.5, 0.0]),
];

/// Translucent triangle, right of center, overlapping the back one.
pub const FRONT_TRIANGLE: [TexturedVertex; 3] = [
    TexturedVertex::new([-0.4, -0.5, 0.0], [0.0, 1.0]),
    TexturedVertex::new([0.8, -0.5, 0.0], [1.0, 1.0]),
    TexturedVertex::new([0.2, 0.8, 0.0], [0.5, 0.0]),
];
