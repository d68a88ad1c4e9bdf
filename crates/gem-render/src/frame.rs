//! Per-frame summary of what a backend has to draw.

use gem_core::RenderState;

use crate::batch::{batches, DrawBatch};
use crate::error::Result;
use crate::pipeline::{blend_state, depth_stencil_state, primitive_state};
use crate::texture::TextureUpload;

/// A frame's pipeline state, draw batches and pixel upload.
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub depth_stencil: Option<wgpu::DepthStencilState>,
    pub blend: Option<wgpu::BlendState>,
    pub draws: Vec<(wgpu::PrimitiveState, DrawBatch)>,
    pub pix: Option<TextureUpload>,
}

impl FramePlan {
    /// Builds the plan from the state left behind by a traversal.
    pub fn from_state(state: &RenderState, depth_format: wgpu::TextureFormat) -> Result<Self> {
        let draws = batches(state.calls())?
            .into_iter()
            .map(|batch| (primitive_state(state, batch.topology), batch))
            .collect();
        let pix = state
            .pix()
            .filter(|img| !img.is_empty())
            .map(TextureUpload::new)
            .transpose()?;

        Ok(Self {
            depth_stencil: depth_stencil_state(state, depth_format)?,
            blend: blend_state(state),
            draws,
            pix,
        })
    }

    /// Returns the total number of vertices across all draws.
    pub fn vertex_count(&self) -> usize {
        self.draws.iter().map(|(_, b)| b.vertices.len()).sum()
    }
}
