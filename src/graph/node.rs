/// Context passed to graph nodes during rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Nodes whose parameters can be moved while audio runs.
///
/// `set_param` only sets where the parameter is heading; nodes glide toward
/// it per sample, so calling this once per block is enough.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn set_param(&mut self, param: Self::Param, value: f32);
}

/// Core trait for audio processing graph nodes.
///
/// Effect nodes transform `out` in place; source nodes add into it.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Clear internal memory (delay lines, filter state). Default: nothing.
    fn reset(&mut self) {}

    /// Check if this node is still producing sound.
    ///
    /// Used by voice management to know when a voice can be freed.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
