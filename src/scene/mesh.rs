use bytemuck::{bytes_of, Pod, Zeroable};
use glam::Mat4;

use super::bounds::BoundingBox;

/// Hard limit of the shading stage's joint matrix array. Changing this
/// value also requires changing it in the vertex shader.
pub const MAX_JOINT_COUNT: usize = 128;

/// Per-mesh uniform data in the exact byte layout the shading stage
/// expects. A renderer uploads it verbatim via `as_bytes`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MeshUniformBlock {
    matrix: [[f32; 4]; 4],
    joint_matrices: [[[f32; 4]; 4]; MAX_JOINT_COUNT],
    joint_count: f32,
    padding: [f32; 3],
}

impl MeshUniformBlock {
    pub fn new(matrix: Mat4) -> Self {
        let mut block = Self::zeroed();
        block.set_matrix(matrix);
        block
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix.to_cols_array_2d();
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.matrix)
    }

    pub fn set_joint_matrix(&mut self, slot: usize, matrix: Mat4) {
        self.joint_matrices[slot] = matrix.to_cols_array_2d();
    }

    pub fn joint_matrix(&self, slot: usize) -> Mat4 {
        Mat4::from_cols_array_2d(&self.joint_matrices[slot])
    }

    pub fn set_joint_count(&mut self, count: usize) {
        self.joint_count = count as f32;
    }

    pub fn joint_count(&self) -> usize {
        self.joint_count as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytes_of(self)
    }
}

/// Range of the model's flat index/vertex buffers forming one draw call.
/// Immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    pub first_index: u32,
    pub index_count: u32,
    pub vertex_count: u32,
    pub material: Option<usize>,
    pub has_indices: bool,
    pub bounds: BoundingBox,
}

impl Primitive {
    pub fn new(
        first_index: u32,
        index_count: u32,
        vertex_count: u32,
        material: Option<usize>,
        bounds: BoundingBox,
    ) -> Self {
        Self {
            first_index,
            index_count,
            vertex_count,
            material,
            has_indices: index_count > 0,
            bounds,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    /// Union of the primitive boxes, in mesh space.
    pub bounds: BoundingBox,
    /// Last world-space projection of `bounds`, written during scene
    /// aggregation.
    pub world_bounds: BoundingBox,
    pub uniform: MeshUniformBlock,
}

impl Mesh {
    pub fn new(name: Option<String>, matrix: Mat4) -> Self {
        Self {
            name,
            primitives: Vec::new(),
            bounds: BoundingBox::default(),
            world_bounds: BoundingBox::default(),
            uniform: MeshUniformBlock::new(matrix),
        }
    }

    pub fn push_primitive(&mut self, primitive: Primitive) {
        self.bounds.merge(&primitive.bounds);
        self.primitives.push(primitive);
    }
}
