//! Vertex batches built from a frame's call log.
//!
//! Legacy primitive modes without a wgpu topology (fans, quads, polygons,
//! line loops) are expanded into ones that have one.

use gem_core::gl;
use gem_core::GlCall;
use glam::{Vec3, Vec4};

use crate::error::{RenderError, Result};

/// Vertex layout shared by all batches.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        // position (vec3)
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        // color (vec4)
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 12,
            shader_location: 1,
        },
    ];

    /// Returns the vertex buffer layout matching this struct.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One draw call ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub topology: wgpu::PrimitiveTopology,
    pub vertices: Vec<Vertex>,
    pub line_width: f32,
}

impl DrawBatch {
    /// Returns the vertex data as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

fn fan(vertices: &[Vec3]) -> Vec<Vec3> {
    let Some((&first, rest)) = vertices.split_first() else {
        return Vec::new();
    };
    rest.windows(2)
        .flat_map(|w| [first, w[0], w[1]])
        .collect()
}

/// Converts a primitive mode and its vertices to a wgpu topology.
pub fn expand(mode: u32, vertices: &[Vec3]) -> Result<(wgpu::PrimitiveTopology, Vec<Vec3>)> {
    use wgpu::PrimitiveTopology as T;

    let expanded = match mode {
        gl::GL_POINTS => (T::PointList, vertices.to_vec()),
        gl::GL_LINES => (T::LineList, vertices[..vertices.len() / 2 * 2].to_vec()),
        gl::GL_LINE_STRIP => (T::LineStrip, vertices.to_vec()),
        gl::GL_LINE_LOOP => {
            let mut v = vertices.to_vec();
            if v.len() > 2 {
                v.push(v[0]);
            }
            (T::LineStrip, v)
        }
        gl::GL_TRIANGLES => (T::TriangleList, vertices[..vertices.len() / 3 * 3].to_vec()),
        gl::GL_TRIANGLE_STRIP => (T::TriangleStrip, vertices.to_vec()),
        gl::GL_TRIANGLE_FAN | gl::GL_POLYGON => (T::TriangleList, fan(vertices)),
        gl::GL_QUADS => (
            T::TriangleList,
            vertices
                .chunks_exact(4)
                .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
                .collect(),
        ),
        gl::GL_QUAD_STRIP => (
            T::TriangleList,
            vertices
                .windows(4)
                .step_by(2)
                .flat_map(|q| [q[0], q[1], q[2], q[1], q[3], q[2]])
                .collect(),
        ),
        other => return Err(RenderError::UnknownPrimitive(other)),
    };
    Ok(expanded)
}

/// Replays a call log into draw batches.
///
/// Each vertex takes the color current at its draw call.
pub fn batches(calls: &[GlCall]) -> Result<Vec<DrawBatch>> {
    let mut color = Vec4::ONE;
    let mut line_width = 1.0;
    let mut out = Vec::new();

    for call in calls {
        match call {
            GlCall::Color4f(c) => color = *c,
            GlCall::LineWidth(w) => line_width = *w,
            GlCall::Draw { mode, vertices } => {
                let (topology, expanded) = expand(*mode, vertices)?;
                if expanded.is_empty() {
                    continue;
                }
                out.push(DrawBatch {
                    topology,
                    vertices: expanded
                        .iter()
                        .map(|p| Vertex {
                            position: p.to_array(),
                            color: color.to_array(),
                        })
                        .collect(),
                    line_width,
                });
            }
            _ => {}
        }
    }
    log::trace!("batched {} draw calls", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::splat(i as f32)).collect()
    }

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        assert_eq!(Vertex::layout().array_stride, 28);
    }

    #[test]
    fn quads_become_two_triangles_each() {
        let (topology, v) = expand(gl::GL_QUADS, &points(9)).unwrap();
        assert_eq!(topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(v.len(), 12);
    }

    #[test]
    fn fan_and_polygon() {
        let (_, v) = expand(gl::GL_POLYGON, &points(5)).unwrap();
        assert_eq!(v.len(), 9);
        assert_eq!(v[3], Vec3::ZERO);
        assert!(expand(gl::GL_TRIANGLE_FAN, &[]).unwrap().1.is_empty());
    }

    #[test]
    fn quad_strip_pairs() {
        let (_, v) = expand(gl::GL_QUAD_STRIP, &points(6)).unwrap();
        assert_eq!(v.len(), 12);
    }

    #[test]
    fn line_loop_is_closed() {
        let (topology, v) = expand(gl::GL_LINE_LOOP, &points(3)).unwrap();
        assert_eq!(topology, wgpu::PrimitiveTopology::LineStrip);
        assert_eq!(v.last(), Some(&Vec3::ZERO));
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn partial_primitives_are_dropped() {
        assert_eq!(expand(gl::GL_LINES, &points(5)).unwrap().1.len(), 4);
        assert_eq!(expand(gl::GL_TRIANGLES, &points(7)).unwrap().1.len(), 6);
    }

    #[test]
    fn unknown_mode() {
        assert_eq!(
            expand(42, &points(3)),
            Err(RenderError::UnknownPrimitive(42))
        );
    }

    #[test]
    fn batches_pick_up_color_and_width() {
        let calls = vec![
            GlCall::Color4f(Vec4::new(1.0, 0.0, 0.0, 1.0)),
            GlCall::LineWidth(3.0),
            GlCall::Draw {
                mode: gl::GL_LINE_STRIP,
                vertices: points(4),
            },
            GlCall::LineWidth(1.0),
            GlCall::Draw {
                mode: gl::GL_POINTS,
                vertices: Vec::new(),
            },
        ];
        let out = batches(&calls).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0].line_width - 3.0).abs() < f32::EPSILON);
        assert_eq!(out[0].vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(out[0].vertex_bytes().len(), 4 * 28);
    }

    proptest::proptest! {
        #[test]
        fn filled_modes_emit_whole_triangles(n in 0usize..40) {
            let input = points(n);
            for (mode, triangles) in [
                (gl::GL_TRIANGLES, n / 3),
                (gl::GL_QUADS, n / 4 * 2),
                (gl::GL_QUAD_STRIP, if n >= 4 { (n - 4) / 2 * 2 + 2 } else { 0 }),
                (gl::GL_POLYGON, n.saturating_sub(2)),
            ] {
                let (topology, v) = expand(mode, &input).unwrap();
                proptest::prop_assert_eq!(topology, wgpu::PrimitiveTopology::TriangleList);
                proptest::prop_assert_eq!(v.len(), triangles * 3);
            }
            let (_, lines) = expand(gl::GL_LINES, &input).unwrap();
            proptest::prop_assert_eq!(lines.len() % 2, 0);
        }
    }
}
