use super::{
    animation::AnimationAsset, material::MaterialAsset, mesh::MeshAsset, node::NodeAsset,
    skin::SkinAsset,
};

/// A fully decoded scene document. All cross-references between the tables
/// are indices consistent with the source document's own indexing, so node
/// `i` here is node `i` of the interchange file.
#[derive(Debug, Clone, Default)]
pub struct DocumentAsset {
    pub name: Option<String>,
    pub roots: Vec<usize>,
    pub nodes: Vec<NodeAsset>,
    pub meshes: Vec<MeshAsset>,
    pub materials: Vec<MaterialAsset>,
    pub skins: Vec<SkinAsset>,
    pub animations: Vec<AnimationAsset>,
}
