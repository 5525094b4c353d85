use glam::Mat4;

/// Skin description from the document. `joints` are node indices; the
/// inverse bind matrix array is parallel to it, or empty for identity bind.
#[derive(Debug, Clone, Default)]
pub struct SkinAsset {
    pub name: Option<String>,
    pub skeleton_root: Option<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
    pub joints: Vec<usize>,
}
