//! Drawable GPU geometry

/// How a renderable issues its draw
pub enum DrawRecord<'a> {
    /// Indexed triangle list over `index_count` indices
    Indexed { index_count: u32 },
    /// Draw arguments read from a GPU buffer at `offset`
    Indirect { args: &'a wgpu::Buffer, offset: u64 },
}

/// Geometry that can be bound and drawn inside a render pass.
///
/// The pipeline and its bind groups are set by the caller.
pub trait Renderable {
    /// Vertex (or per-instance) buffer bound at slot 0
    fn vertex_buffer(&self) -> &wgpu::Buffer;

    fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        None
    }

    fn draw_record(&self) -> DrawRecord<'_>;

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer().slice(..));
        match self.draw_record() {
            DrawRecord::Indexed { index_count } => {
                if let Some(indices) = self.index_buffer() {
                    pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..index_count, 0, 0..1);
                }
            }
            DrawRecord::Indirect { args, offset } => pass.draw_indirect(args, offset),
        }
    }
}
