use glam::Vec4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::Linear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPath {
    Translation,
    Rotation,
    Scale,
}

/// Keyframe curve: `inputs` are strictly increasing times, `outputs` is
/// parallel to it. Cubic-spline curves store in-tangent, value and
/// out-tangent per keyframe, so their output array is three times as long.
#[derive(Debug, Clone, Default)]
pub struct AnimationSamplerAsset {
    pub interpolation: Interpolation,
    pub inputs: Vec<f32>,
    pub outputs: Vec<Vec4>,
}

#[derive(Debug, Clone)]
pub struct AnimationChannelAsset {
    pub path: ChannelPath,
    pub node: usize,
    pub sampler: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationAsset {
    pub name: Option<String>,
    pub samplers: Vec<AnimationSamplerAsset>,
    pub channels: Vec<AnimationChannelAsset>,
}
