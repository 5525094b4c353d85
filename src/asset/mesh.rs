use super::primitive::PrimitiveAsset;

#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveAsset>,
}
