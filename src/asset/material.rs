use glam::Vec4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

/// Reference to a texture in the document's texture table plus the UV set
/// it samples. Texture decoding stays outside this crate.
#[derive(Debug, Clone, Copy)]
pub struct TextureRef {
    pub texture: usize,
    pub tex_coord: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PbrWorkflow {
    #[default]
    MetallicRoughness,
    SpecularGlossiness,
}

#[derive(Debug, Clone)]
pub struct MaterialAsset {
    pub name: Option<String>,
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub base_color_factor: Vec4,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub emissive_factor: Vec4,
    pub base_color_texture: Option<TextureRef>,
    pub metallic_roughness_texture: Option<TextureRef>,
    pub normal_texture: Option<TextureRef>,
    pub occlusion_texture: Option<TextureRef>,
    pub emissive_texture: Option<TextureRef>,
    pub workflow: PbrWorkflow,
}

impl Default for MaterialAsset {
    fn default() -> Self {
        Self {
            name: None,
            alpha_mode: AlphaMode::default(),
            alpha_cutoff: 0.5,
            base_color_factor: Vec4::ONE,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            emissive_factor: Vec4::ONE,
            base_color_texture: None,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            workflow: PbrWorkflow::default(),
        }
    }
}
