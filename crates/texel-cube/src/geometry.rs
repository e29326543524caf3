use texel_engine::render::TexturedVertex;

const fn v(x: f32, y: f32, z: f32, u: f32, t: f32) -> TexturedVertex {
    TexturedVertex::new([x, y, z], [u, t])
}

/// Unit cube centered on the origin: 6 faces, 2 triangles each, no index buffer.
pub const CUBE_VERTICES: [TexturedVertex; 36] = [
    // front (+z)
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 1.0),
    v( 0.5,  0.5,  0.5, 1.0, 1.0),
    v(-0.5,  0.5,  0.5, 0.0, 1.0),
    v(-0.5, -0.5,  0.5, 0.0, 0.0),

    // back (-z)
    v(-0.5, -0.5, -0.5, 0.0, 0.0),
    v( 0.5, -0.5, -0.5, 1.0, 0.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v(-0.5,  0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5, -0.5, 0.0, 0.0),

    // left (-x)
    v(-0.5,  0.5,  0.5, 1.0, 0.0),
    v(-0.5,  0.5, -0.5, 1.0, 1.0),
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    v(-0.5,  0.5,  0.5, 1.0, 0.0),

    // right (+x)
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5, -0.5, -0.5, 0.0, 1.0),
    v( 0.5, -0.5, -0.5, 0.0, 1.0),
    v( 0.5, -0.5,  0.5, 0.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0),

    // top (+y)
    v(-0.5,  0.5, -0.5, 0.0, 1.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v(-0.5,  0.5,  0.5, 0.0, 0.0),
    v(-0.5,  0.5, -0.5, 0.0, 1.0),

    // bottom (-y)
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v( 0.5, -0.5, -0.5, 1.0, 1.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_holds_five_floats_per_vertex() {
        let floats: &[f32] = bytemuck::cast_slice(&CUBE_VERTICES);
        assert_eq!(floats.len(), 36 * TexturedVertex::FLOATS);
    }

    #[test]
    fn every_face_is_planar_on_an_axis() {
        // Each group of 6 vertices shares one coordinate fixed at ±0.5.
        for face in CUBE_VERTICES.chunks(6) {
            let fixed = (0..3).find(|&axis| {
                let c = face[0].position[axis];
                c.abs() == 0.5 && face.iter().all(|v| v.position[axis] == c)
            });
            assert!(fixed.is_some(), "face is not axis-aligned: {face:?}");
        }
    }

    #[test]
    fn faces_cover_all_six_sides() {
        let mut sides: Vec<(usize, i32)> = CUBE_VERTICES
            .chunks(6)
            .map(|face| {
                let axis = (0..3)
                    .find(|&a| face.iter().all(|v| v.position[a] == face[0].position[a]))
                    .expect("planar face");
                (axis, face[0].position[axis].signum() as i32)
            })
            .collect();
        sides.sort();
        sides.dedup();
        assert_eq!(sides.len(), 6);
    }

    #[test]
    fn texcoords_stay_in_unit_square() {
        assert!(CUBE_VERTICES
            .iter()
            .all(|v| v.uv.iter().all(|c| (0.0..=1.0).contains(c))));
    }

    #[test]
    fn triangles_are_not_degenerate() {
        for tri in CUBE_VERTICES.chunks(3) {
            let p = |i: usize| glam::Vec3::from(tri[i].position);
            let area = (p(1) - p(0)).cross(p(2) - p(0)).length();
            assert!(area > 0.0);
        }
    }
}
