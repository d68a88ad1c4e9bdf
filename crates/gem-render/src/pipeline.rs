//! Pipeline state derived from the accumulated render state.

use gem_core::gl;
use gem_core::RenderState;

use crate::error::{RenderError, Result};

/// Maps a graphics comparison constant to its wgpu equivalent.
pub fn compare_function(func: u32) -> Result<wgpu::CompareFunction> {
    Ok(match func {
        gl::GL_NEVER => wgpu::CompareFunction::Never,
        gl::GL_LESS => wgpu::CompareFunction::Less,
        gl::GL_EQUAL => wgpu::CompareFunction::Equal,
        gl::GL_LEQUAL => wgpu::CompareFunction::LessEqual,
        gl::GL_GREATER => wgpu::CompareFunction::Greater,
        gl::GL_NOTEQUAL => wgpu::CompareFunction::NotEqual,
        gl::GL_GEQUAL => wgpu::CompareFunction::GreaterEqual,
        gl::GL_ALWAYS => wgpu::CompareFunction::Always,
        other => return Err(RenderError::UnknownCompareFunction(other)),
    })
}

/// Returns the depth state for the current frame, or `None` when depth
/// testing is disabled.
pub fn depth_stencil_state(
    state: &RenderState,
    format: wgpu::TextureFormat,
) -> Result<Option<wgpu::DepthStencilState>> {
    if !state.is_enabled(gl::GL_DEPTH_TEST) {
        return Ok(None);
    }
    Ok(Some(wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: compare_function(state.depth_func())?,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }))
}

/// Returns the primitive state for a topology, culling back faces when
/// `GL_CULL_FACE` is enabled.
pub fn primitive_state(
    state: &RenderState,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology,
        cull_mode: state
            .is_enabled(gl::GL_CULL_FACE)
            .then_some(wgpu::Face::Back),
        ..Default::default()
    }
}

/// Returns alpha blending when `GL_BLEND` is enabled.
pub fn blend_state(state: &RenderState) -> Option<wgpu::BlendState> {
    state
        .is_enabled(gl::GL_BLEND)
        .then_some(wgpu::BlendState::ALPHA_BLENDING)
}
