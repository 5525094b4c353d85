use glam::Mat4;

/// Binds a mesh to a set of joint nodes. `joints` are arena indices; the
/// inverse bind matrix array is parallel to it when non-empty.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub name: Option<String>,
    pub skeleton_root: Option<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
    pub joints: Vec<usize>,
}

impl Skin {
    /// Inverse bind matrix for a joint slot; an empty bind array means
    /// identity bind.
    pub fn inverse_bind_matrix(&self, slot: usize) -> Mat4 {
        self.inverse_bind_matrices
            .get(slot)
            .copied()
            .unwrap_or(Mat4::IDENTITY)
    }
}
