pub type TexCoords = Vec<[f32; 2]>;

/// Raw attribute arrays of one primitive, as decoded by the document
/// loader. All arrays are parallel to `positions`.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveAsset {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<TexCoords>,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
    pub indices: Option<Vec<u32>>,
    pub material: Option<usize>,
}
