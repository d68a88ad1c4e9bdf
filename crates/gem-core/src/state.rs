//! Shared render state threaded through a render traversal.
//!
//! Nodes never talk to the graphics API directly. They [`issue`] a [`GlCall`]
//! against the [`RenderState`], which folds the call into its snapshot of the
//! current graphics configuration, remembers which node last touched that
//! part of the state, and appends the call to the frame's call log. A backend
//! replays the log; everything downstream of a node sees exactly the
//! cumulative effect of the nodes before it.
//!
//! [`issue`]: RenderState::issue

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glam::{Mat4, Vec3, Vec4};

use crate::gl;
use crate::node::NodeId;
use crate::pixels::PixelImage;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
    Baseline,
}

/// A text draw request, everything a font backend needs to rasterize it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    /// The string to render.
    pub text: String,
    /// Font file or face name.
    pub font: String,
    /// Font size in points.
    pub size: f32,
    /// Tessellation precision for outline fonts.
    pub precision: f32,
    /// Horizontal alignment relative to the origin.
    pub halign: HAlign,
    /// Vertical alignment relative to the origin.
    pub valign: VAlign,
    /// Modelview transform in effect when the text was issued.
    pub transform: Mat4,
}

/// One graphics-API side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    /// Sets the depth comparison function.
    DepthFunc(u32),
    /// Sets the current texture coordinate from four shorts.
    TexCoord4s([i16; 4]),
    /// Enables a capability.
    Enable(u32),
    /// Disables a capability.
    Disable(u32),
    /// Sets the current color.
    Color4f(Vec4),
    /// Sets the rasterized line width.
    LineWidth(f32),
    /// Binds a texture object to a target.
    BindTexture { target: u32, texture: u32 },
    /// Draws vertices with the given primitive mode.
    Draw { mode: u32, vertices: Vec<Vec3> },
    /// Draws a string of text.
    DrawText(TextDraw),
}

/// Part of the render state a call touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateCategory {
    Depth,
    TexCoord,
    Capability,
    Color,
    LineWidth,
    Texture,
    Geometry,
    Text,
    Pix,
}

impl GlCall {
    /// Returns the part of the state this call modifies.
    #[must_use]
    pub fn category(&self) -> StateCategory {
        match self {
            GlCall::DepthFunc(_) => StateCategory::Depth,
            GlCall::TexCoord4s(_) => StateCategory::TexCoord,
            GlCall::Enable(_) | GlCall::Disable(_) => StateCategory::Capability,
            GlCall::Color4f(_) => StateCategory::Color,
            GlCall::LineWidth(_) => StateCategory::LineWidth,
            GlCall::BindTexture { .. } => StateCategory::Texture,
            GlCall::Draw { .. } => StateCategory::Geometry,
            GlCall::DrawText(_) => StateCategory::Text,
        }
    }
}

/// The accumulated graphics configuration for one frame.
#[derive(Debug, Clone)]
pub struct RenderState {
    frame: u64,
    enabled: BTreeSet<u32>,
    depth_func: u32,
    tex_coord: [i16; 4],
    color: Vec4,
    line_width: f32,
    bound_textures: BTreeMap<u32, u32>,
    modelview: Mat4,
    pix: Option<PixelImage>,
    last_modifier: HashMap<StateCategory, NodeId>,
    calls: Vec<GlCall>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            frame: 0,
            enabled: BTreeSet::new(),
            depth_func: gl::GL_LESS,
            tex_coord: [0, 0, 0, 1],
            color: Vec4::ONE,
            line_width: 1.0,
            bound_textures: BTreeMap::new(),
            modelview: Mat4::IDENTITY,
            pix: None,
            last_modifier: HashMap::new(),
            calls: Vec::new(),
        }
    }
}

impl RenderState {
    /// Creates a state holding the graphics defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the graphics defaults and advances the frame counter.
    pub fn begin_frame(&mut self) {
        let frame = self.frame + 1;
        *self = Self {
            frame,
            ..Self::default()
        };
    }

    /// Returns the number of frames begun on this state.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Applies a graphics call on behalf of `by`.
    pub fn issue(&mut self, by: NodeId, call: GlCall) {
        match &call {
            GlCall::DepthFunc(func) => self.depth_func = *func,
            GlCall::TexCoord4s(v) => self.tex_coord = *v,
            GlCall::Enable(cap) => {
                self.enabled.insert(*cap);
            }
            GlCall::Disable(cap) => {
                self.enabled.remove(cap);
            }
            GlCall::Color4f(c) => self.color = *c,
            GlCall::LineWidth(w) => self.line_width = *w,
            GlCall::BindTexture { target, texture } => {
                if *texture == 0 {
                    self.bound_textures.remove(target);
                } else {
                    self.bound_textures.insert(*target, *texture);
                }
            }
            GlCall::Draw { .. } | GlCall::DrawText(_) => {}
        }
        self.last_modifier.insert(call.category(), by);
        self.calls.push(call);
    }

    /// Returns the calls issued so far this frame, in order.
    #[must_use]
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Returns the node that last modified the given part of the state.
    #[must_use]
    pub fn last_modifier(&self, category: StateCategory) -> Option<NodeId> {
        self.last_modifier.get(&category).copied()
    }

    /// Returns whether a capability is currently enabled.
    #[must_use]
    pub fn is_enabled(&self, cap: u32) -> bool {
        self.enabled.contains(&cap)
    }

    /// Returns all enabled capabilities.
    pub fn enabled(&self) -> impl Iterator<Item = u32> + '_ {
        self.enabled.iter().copied()
    }

    /// Returns the current depth comparison function.
    #[must_use]
    pub fn depth_func(&self) -> u32 {
        self.depth_func
    }

    /// Returns the current texture coordinate.
    #[must_use]
    pub fn tex_coord(&self) -> [i16; 4] {
        self.tex_coord
    }

    /// Returns the current color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Returns the current line width.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Returns the texture bound to a target, if any.
    #[must_use]
    pub fn bound_texture(&self, target: u32) -> Option<u32> {
        self.bound_textures.get(&target).copied()
    }

    /// Returns the current modelview transform.
    #[must_use]
    pub fn modelview(&self) -> Mat4 {
        self.modelview
    }

    /// Sets the modelview transform. Called by the host before traversal.
    pub fn set_modelview(&mut self, modelview: Mat4) {
        self.modelview = modelview;
    }

    /// Returns the current pixel block.
    #[must_use]
    pub fn pix(&self) -> Option<&PixelImage> {
        self.pix.as_ref()
    }

    /// Replaces the current pixel block on behalf of `by`.
    pub fn set_pix(&mut self, by: NodeId, pix: Option<PixelImage>) {
        self.pix = pix;
        self.last_modifier.insert(StateCategory::Pix, by);
    }
}
