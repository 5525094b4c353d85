use std::path::Path;

use glam::{Mat4, Quat, Vec3, Vec4};
use gltf::{
    animation::{util::ReadOutputs, Interpolation as GltfInterpolation, Property},
    material::AlphaMode as GltfAlphaMode,
    scene::Transform,
};
use log::warn;

use crate::asset::{
    animation::{
        AnimationAsset, AnimationChannelAsset, AnimationSamplerAsset, ChannelPath, Interpolation,
    },
    document::DocumentAsset,
    material::{AlphaMode, MaterialAsset, PbrWorkflow, TextureRef},
    mesh::MeshAsset,
    node::{DecomposedTransform, NodeAsset, NodeTransform},
    primitive::PrimitiveAsset,
    skin::SkinAsset,
};

/// Parse a glTF file and decode it into a document. File parsing itself is
/// delegated to the gltf crate; this only maps the parsed structures onto
/// the asset tables, keeping the file's own indexing intact.
pub fn load_from_path<P>(path: P) -> Result<DocumentAsset, gltf::Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;
    let name = path.file_stem().map(|stem| stem.to_string_lossy().to_string());
    Ok(load_document(&document, &buffers, name))
}

fn load_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    name: Option<String>,
) -> DocumentAsset {
    let roots = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| scene.nodes().map(|node| node.index()).collect())
        .unwrap_or_default();
    DocumentAsset {
        name,
        roots,
        nodes: document.nodes().map(load_node).collect(),
        meshes: document
            .meshes()
            .map(|mesh| load_mesh(mesh, buffers))
            .collect(),
        materials: document.materials().map(load_material).collect(),
        skins: document
            .skins()
            .map(|skin| load_skin(skin, buffers))
            .collect(),
        animations: document
            .animations()
            .map(|animation| load_animation(animation, buffers))
            .collect(),
    }
}

fn load_node(node: gltf::Node) -> NodeAsset {
    let transform = match node.transform() {
        Transform::Matrix { matrix } => NodeTransform::Matrix(Mat4::from_cols_array_2d(&matrix)),
        Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => NodeTransform::Decomposed(DecomposedTransform {
            translation: Vec3::from_array(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from_array(scale),
        }),
    };
    NodeAsset {
        name: node.name().map(str::to_string),
        transform,
        mesh: node.mesh().map(|mesh| mesh.index()),
        skin: node.skin().map(|skin| skin.index()),
        children: node.children().map(|child| child.index()).collect(),
    }
}

fn load_mesh(mesh: gltf::Mesh, buffers: &[gltf::buffer::Data]) -> MeshAsset {
    MeshAsset {
        name: mesh.name().map(str::to_string),
        primitives: mesh
            .primitives()
            .map(|primitive| load_primitive(primitive, buffers))
            .collect(),
    }
}

fn load_primitive(primitive: gltf::Primitive, buffers: &[gltf::buffer::Data]) -> PrimitiveAsset {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(Iterator::collect)
        .unwrap_or_default();
    if positions.is_empty() {
        warn!("Primitive without positions in mesh");
    }
    let mut tex_coords = Vec::new();
    // only two UV sets survive into the vertex layout
    for set in 0..2 {
        match reader.read_tex_coords(set) {
            Some(coords) => tex_coords.push(coords.into_f32().collect()),
            None => break,
        }
    }
    PrimitiveAsset {
        positions,
        normals: reader
            .read_normals()
            .map(Iterator::collect)
            .unwrap_or_default(),
        tex_coords,
        joints: reader
            .read_joints(0)
            .map(|joints| joints.into_u16().collect())
            .unwrap_or_default(),
        weights: reader
            .read_weights(0)
            .map(|weights| weights.into_f32().collect())
            .unwrap_or_default(),
        indices: reader.read_indices().map(|indices| indices.into_u32().collect()),
        material: primitive.material().index(),
    }
}

fn texture_ref(info: Option<gltf::texture::Info>) -> Option<TextureRef> {
    info.map(|info| TextureRef {
        texture: info.texture().index(),
        tex_coord: info.tex_coord(),
    })
}

fn load_material(material: gltf::Material) -> MaterialAsset {
    let pbr = material.pbr_metallic_roughness();
    let workflow = if material.pbr_specular_glossiness().is_some() {
        PbrWorkflow::SpecularGlossiness
    } else {
        PbrWorkflow::MetallicRoughness
    };
    let emissive = material.emissive_factor();
    MaterialAsset {
        name: material.name().map(str::to_string),
        alpha_mode: match material.alpha_mode() {
            GltfAlphaMode::Opaque => AlphaMode::Opaque,
            GltfAlphaMode::Mask => AlphaMode::Mask,
            GltfAlphaMode::Blend => AlphaMode::Blend,
        },
        alpha_cutoff: material.alpha_cutoff().unwrap_or(0.5),
        base_color_factor: Vec4::from_array(pbr.base_color_factor()),
        metallic_factor: pbr.metallic_factor(),
        roughness_factor: pbr.roughness_factor(),
        emissive_factor: Vec4::new(emissive[0], emissive[1], emissive[2], 1.0),
        base_color_texture: texture_ref(pbr.base_color_texture()),
        metallic_roughness_texture: texture_ref(pbr.metallic_roughness_texture()),
        normal_texture: material.normal_texture().map(|normal| TextureRef {
            texture: normal.texture().index(),
            tex_coord: normal.tex_coord(),
        }),
        occlusion_texture: material.occlusion_texture().map(|occlusion| TextureRef {
            texture: occlusion.texture().index(),
            tex_coord: occlusion.tex_coord(),
        }),
        emissive_texture: texture_ref(material.emissive_texture()),
        workflow,
    }
}

fn load_skin(skin: gltf::Skin, buffers: &[gltf::buffer::Data]) -> SkinAsset {
    let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
    SkinAsset {
        name: skin.name().map(str::to_string),
        skeleton_root: skin.skeleton().map(|node| node.index()),
        inverse_bind_matrices: reader
            .read_inverse_bind_matrices()
            .map(|matrices| {
                matrices
                    .map(|matrix| Mat4::from_cols_array_2d(&matrix))
                    .collect()
            })
            .unwrap_or_default(),
        joints: skin.joints().map(|joint| joint.index()).collect(),
    }
}

fn load_animation(animation: gltf::Animation, buffers: &[gltf::buffer::Data]) -> AnimationAsset {
    let mut samplers = Vec::new();
    let mut channels = Vec::new();
    for channel in animation.channels() {
        let path = match channel.target().property() {
            Property::Translation => ChannelPath::Translation,
            Property::Rotation => ChannelPath::Rotation,
            Property::Scale => ChannelPath::Scale,
            Property::MorphTargetWeights => {
                warn!(
                    "Skipping morph target weights channel in animation {:?}",
                    animation.name()
                );
                continue;
            }
        };
        let interpolation = match channel.sampler().interpolation() {
            GltfInterpolation::Linear => Interpolation::Linear,
            GltfInterpolation::Step => Interpolation::Step,
            GltfInterpolation::CubicSpline => Interpolation::CubicSpline,
        };
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
        let inputs: Vec<f32> = reader
            .read_inputs()
            .map(Iterator::collect)
            .unwrap_or_default();
        let outputs: Vec<Vec4> = match reader.read_outputs() {
            Some(ReadOutputs::Translations(translations)) => translations
                .map(|value| Vec4::new(value[0], value[1], value[2], 0.0))
                .collect(),
            Some(ReadOutputs::Scales(scales)) => scales
                .map(|value| Vec4::new(value[0], value[1], value[2], 0.0))
                .collect(),
            Some(ReadOutputs::Rotations(rotations)) => {
                rotations.into_f32().map(Vec4::from_array).collect()
            }
            Some(ReadOutputs::MorphTargetWeights(_)) | None => Vec::new(),
        };
        channels.push(AnimationChannelAsset {
            path,
            node: channel.target().node().index(),
            sampler: samplers.len(),
        });
        samplers.push(AnimationSamplerAsset {
            interpolation,
            inputs,
            outputs,
        });
    }
    AnimationAsset {
        name: animation.name().map(str::to_string),
        samplers,
        channels,
    }
}
