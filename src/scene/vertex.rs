use bytemuck::{Pod, Zeroable};

/// Element of the flat vertex buffer built at load time. The layout must
/// match the shading stage's vertex input.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
    pub joint0: [f32; 4],
    pub weight0: [f32; 4],
}
