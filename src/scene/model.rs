use std::error::Error;
use std::fmt::{self, Display, Formatter};

use glam::{Mat4, Vec3};
use log::warn;

use crate::asset::animation::ChannelPath;
use crate::asset::document::DocumentAsset;
use crate::asset::material::{AlphaMode, MaterialAsset};
use crate::asset::node::NodeTransform;
use crate::asset::primitive::PrimitiveAsset;

use super::animation::{Animation, AnimationChannel, AnimationSampler, Interpolation};
use super::bounds::BoundingBox;
use super::mesh::{Mesh, Primitive, MAX_JOINT_COUNT};
use super::node::Node;
use super::skin::Skin;
use super::vertex::Vertex;

/// Structural problems that make a document unusable as a runtime model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    TooManyJoints { count: usize, max: usize },
    BindMatrixCountMismatch { joints: usize, matrices: usize },
    KeyframeCountMismatch { inputs: usize, outputs: usize },
    NonMonotonicKeyframes,
    IndexOutOfRange { kind: &'static str, index: usize, len: usize },
    InvalidHierarchy { node: usize },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyJoints { count, max } => {
                write!(f, "skin has {count} joints, at most {max} are supported")
            }
            Self::BindMatrixCountMismatch { joints, matrices } => {
                write!(
                    f,
                    "skin has {joints} joints but {matrices} inverse bind matrices"
                )
            }
            Self::KeyframeCountMismatch { inputs, outputs } => {
                write!(
                    f,
                    "animation sampler has {inputs} keyframe times but {outputs} outputs"
                )
            }
            Self::NonMonotonicKeyframes => {
                write!(f, "animation sampler keyframe times are not strictly increasing")
            }
            Self::IndexOutOfRange { kind, index, len } => {
                write!(f, "{kind} index {index} out of range (table has {len} entries)")
            }
            Self::InvalidHierarchy { node } => {
                write!(f, "node hierarchy is not a tree at node {node}")
            }
        }
    }
}

impl Error for LoadError {}

/// Axis-aligned extent of the whole scene in world space.
#[derive(Debug, Clone, Copy)]
pub struct Dimensions {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            min: Vec3::MAX,
            max: Vec3::MIN,
        }
    }
}

impl Dimensions {
    /// False until some node has contributed a valid bounding box; the
    /// extrema are meaningless then and must not be displayed.
    pub fn is_defined(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}

/// Runtime scene: a node arena plus flat vertex/index buffers ready for
/// upload. Nodes reference meshes and skins by index; `roots` are the
/// entry points of the hierarchy. Each mesh-bearing node owns its own
/// entry in `meshes`, so a mesh shared by several document nodes becomes
/// one instance per node and every uniform block holds exactly one node's
/// world matrix.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: Option<String>,
    pub roots: Vec<usize>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub skins: Vec<Skin>,
    pub materials: Vec<MaterialAsset>,
    pub animations: Vec<Animation>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub dimensions: Dimensions,
}

fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), LoadError> {
    if index < len {
        Ok(())
    } else {
        Err(LoadError::IndexOutOfRange { kind, index, len })
    }
}

impl Model {
    /// Build a runtime model from a parsed document, validating every
    /// cross-table reference. World transforms, joint matrices and scene
    /// dimensions are ready once this returns.
    pub fn from_document(document: DocumentAsset) -> Result<Self, LoadError> {
        let mut model = Self {
            name: document.name,
            materials: document.materials,
            ..Self::default()
        };

        let mut prototypes = Vec::with_capacity(document.meshes.len());
        for mesh_asset in document.meshes {
            let mut mesh = Mesh::new(mesh_asset.name, Mat4::IDENTITY);
            for primitive in mesh_asset.primitives {
                let primitive = model.load_primitive(primitive)?;
                mesh.push_primitive(primitive);
            }
            prototypes.push(mesh);
        }

        let node_count = document.nodes.len();
        for (index, asset) in document.nodes.into_iter().enumerate() {
            let mut node = Node::new(index);
            node.name = asset.name;
            match asset.transform {
                NodeTransform::Matrix(matrix) => node.matrix = Some(matrix),
                NodeTransform::Decomposed(decomposed) => {
                    node.translation = decomposed.translation;
                    node.rotation = decomposed.rotation;
                    node.scale = decomposed.scale;
                }
            }
            if let Some(mesh) = asset.mesh {
                check_index("mesh", mesh, prototypes.len())?;
                // one instance per node; the geometry ranges still point
                // into the shared flat buffers
                node.mesh = Some(model.meshes.len());
                model.meshes.push(prototypes[mesh].clone());
            }
            if let Some(skin) = asset.skin {
                check_index("skin", skin, document.skins.len())?;
                node.skin = Some(skin);
            }
            for &child in &asset.children {
                check_index("node", child, node_count)?;
            }
            node.children = asset.children;
            model.nodes.push(node);
        }
        for index in 0..node_count {
            for i in 0..model.nodes[index].children.len() {
                let child = model.nodes[index].children[i];
                if model.nodes[child].parent.is_some() {
                    return Err(LoadError::InvalidHierarchy { node: child });
                }
                model.nodes[child].parent = Some(index);
            }
        }

        for &root in &document.roots {
            check_index("node", root, node_count)?;
            if model.nodes[root].parent.is_some() {
                return Err(LoadError::InvalidHierarchy { node: root });
            }
        }
        model.roots = document.roots;

        // a parent chain longer than the arena can only mean a cycle
        for index in 0..node_count {
            let mut current = index;
            let mut steps = 0;
            while let Some(parent) = model.nodes[current].parent {
                steps += 1;
                if steps > node_count {
                    return Err(LoadError::InvalidHierarchy { node: index });
                }
                current = parent;
            }
        }

        for skin in document.skins {
            if skin.joints.len() > MAX_JOINT_COUNT {
                return Err(LoadError::TooManyJoints {
                    count: skin.joints.len(),
                    max: MAX_JOINT_COUNT,
                });
            }
            if !skin.inverse_bind_matrices.is_empty()
                && skin.inverse_bind_matrices.len() != skin.joints.len()
            {
                return Err(LoadError::BindMatrixCountMismatch {
                    joints: skin.joints.len(),
                    matrices: skin.inverse_bind_matrices.len(),
                });
            }
            for &joint in &skin.joints {
                check_index("node", joint, node_count)?;
            }
            if let Some(root) = skin.skeleton_root {
                check_index("node", root, node_count)?;
            }
            model.skins.push(Skin {
                name: skin.name,
                skeleton_root: skin.skeleton_root,
                inverse_bind_matrices: skin.inverse_bind_matrices,
                joints: skin.joints,
            });
        }

        for (index, asset) in document.animations.into_iter().enumerate() {
            let mut samplers = Vec::with_capacity(asset.samplers.len());
            let mut start = f32::MAX;
            let mut end = f32::MIN;
            for sampler in asset.samplers {
                if sampler.inputs.windows(2).any(|pair| pair[1] <= pair[0]) {
                    return Err(LoadError::NonMonotonicKeyframes);
                }
                let per_keyframe = match sampler.interpolation {
                    Interpolation::CubicSpline => 3,
                    _ => 1,
                };
                if sampler.outputs.len() != sampler.inputs.len() * per_keyframe {
                    return Err(LoadError::KeyframeCountMismatch {
                        inputs: sampler.inputs.len(),
                        outputs: sampler.outputs.len(),
                    });
                }
                let sampler = AnimationSampler {
                    interpolation: sampler.interpolation,
                    inputs: sampler.inputs,
                    outputs: sampler.outputs,
                };
                if let Some((first, last)) = sampler.time_range() {
                    start = start.min(first);
                    end = end.max(last);
                }
                samplers.push(sampler);
            }
            let mut channels = Vec::with_capacity(asset.channels.len());
            for channel in asset.channels {
                check_index("node", channel.node, node_count)?;
                check_index("sampler", channel.sampler, samplers.len())?;
                if model.nodes[channel.node].matrix.is_some() {
                    warn!(
                        "animation channel targets node {} which has an explicit matrix; \
                         the animated transform will not take effect",
                        channel.node
                    );
                }
                channels.push(AnimationChannel {
                    path: channel.path,
                    node: channel.node,
                    sampler: channel.sampler,
                });
            }
            if start > end {
                start = 0.0;
                end = 0.0;
            }
            model.animations.push(Animation {
                name: asset.name.unwrap_or_else(|| format!("animation {index}")),
                samplers,
                channels,
                start,
                end,
            });
        }

        model.update();
        model.compute_scene_dimensions();
        Ok(model)
    }

    /// Append one primitive's attributes to the flat buffers. Index values
    /// are rebased so they keep addressing this primitive's vertices.
    fn load_primitive(&mut self, asset: PrimitiveAsset) -> Result<Primitive, LoadError> {
        if let Some(material) = asset.material {
            check_index("material", material, self.materials.len())?;
        }
        let vertex_start = self.vertices.len() as u32;
        let first_index = self.indices.len() as u32;
        let vertex_count = asset.positions.len();
        let mut bounds = BoundingBox::default();

        for (i, &position) in asset.positions.iter().enumerate() {
            bounds.extend(Vec3::from(position));
            self.vertices.push(Vertex {
                position,
                normal: asset.normals.get(i).copied().unwrap_or([0.0; 3]),
                uv0: tex_coord(&asset, 0, i),
                uv1: tex_coord(&asset, 1, i),
                joint0: asset
                    .joints
                    .get(i)
                    .map(|joints| joints.map(f32::from))
                    .unwrap_or([0.0; 4]),
                weight0: asset.weights.get(i).copied().unwrap_or([0.0; 4]),
            });
        }

        let mut index_count = 0;
        if let Some(indices) = asset.indices {
            index_count = indices.len();
            for index in indices {
                check_index("vertex", index as usize, vertex_count)?;
                self.indices.push(index + vertex_start);
            }
        }

        Ok(Primitive::new(
            first_index,
            index_count as u32,
            vertex_count as u32,
            asset.material,
            bounds,
        ))
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    /// World transform of a node, accumulated up the parent chain.
    pub fn world_matrix(&self, index: usize) -> Mat4 {
        let node = &self.nodes[index];
        match node.parent {
            Some(parent) => self.world_matrix(parent) * node.local_matrix(),
            None => node.local_matrix(),
        }
    }

    /// Refresh every mesh uniform from the current node transforms. Call
    /// after mutating node transforms, typically once per animation step.
    pub fn update(&mut self) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.update_node(root);
        }
    }

    fn update_node(&mut self, index: usize) {
        if let Some(mesh_index) = self.nodes[index].mesh {
            let world = self.world_matrix(index);
            let mut joint_matrices = Vec::new();
            if let Some(skin_index) = self.nodes[index].skin {
                // joint matrices are relative to the mesh node, so the
                // mesh's own world transform is factored back out
                let inverse_world = world.inverse();
                let skin = &self.skins[skin_index];
                let joint_count = skin.joints.len().min(MAX_JOINT_COUNT);
                joint_matrices.reserve(joint_count);
                for slot in 0..joint_count {
                    let joint_world = self.world_matrix(skin.joints[slot]);
                    joint_matrices
                        .push(inverse_world * joint_world * skin.inverse_bind_matrix(slot));
                }
            }
            let mesh = &mut self.meshes[mesh_index];
            mesh.uniform.set_matrix(world);
            for (slot, &matrix) in joint_matrices.iter().enumerate() {
                mesh.uniform.set_joint_matrix(slot, matrix);
            }
            mesh.uniform.set_joint_count(joint_matrices.len());
        }
        for i in 0..self.nodes[index].children.len() {
            let child = self.nodes[index].children[i];
            self.update_node(child);
        }
    }

    /// Write the animated transforms for one point in time into the node
    /// arena. Time is in the animation's own units; the caller wraps or
    /// clamps it into `[start, end]` and then calls [`Model::update`].
    pub fn update_animation(&mut self, index: usize, time: f32) {
        let Model {
            animations, nodes, ..
        } = self;
        let Some(animation) = animations.get(index) else {
            warn!(
                "animation index {index} out of range ({} animations)",
                animations.len()
            );
            return;
        };
        for channel in &animation.channels {
            let sampler = &animation.samplers[channel.sampler];
            let node = &mut nodes[channel.node];
            match channel.path {
                ChannelPath::Translation => {
                    if let Some(value) = sampler.sample(time) {
                        node.translation = value.truncate();
                    }
                }
                ChannelPath::Rotation => {
                    if let Some(rotation) = sampler.sample_rotation(time) {
                        node.rotation = rotation;
                    }
                }
                ChannelPath::Scale => {
                    if let Some(value) = sampler.sample(time) {
                        node.scale = value.truncate();
                    }
                }
            }
        }
    }

    fn calculate_bounding_box(&mut self, index: usize, parent_aabb: BoundingBox) {
        let mut own = BoundingBox::default();
        if let Some(mesh_index) = self.nodes[index].mesh {
            if self.meshes[mesh_index].bounds.valid {
                own = self.meshes[mesh_index]
                    .bounds
                    .transformed(self.world_matrix(index));
                self.meshes[mesh_index].world_bounds = own;
            }
        }
        let mut aabb = parent_aabb;
        aabb.merge(&own);
        let node = &mut self.nodes[index];
        node.bvh = own;
        node.aabb = aabb;
        for i in 0..self.nodes[index].children.len() {
            let child = self.nodes[index].children[i];
            self.calculate_bounding_box(child, aabb);
        }
    }

    /// Aggregate per-node world boxes into the scene dimensions. Leaves
    /// the previous dimensions untouched when no node contributes one.
    fn compute_scene_dimensions(&mut self) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.calculate_bounding_box(root, BoundingBox::default());
        }
        let mut scene = BoundingBox::default();
        for node in &self.nodes {
            scene.merge(&node.bvh);
        }
        if scene.valid {
            self.dimensions = Dimensions {
                min: scene.min,
                max: scene.max,
            };
        } else {
            warn!("no node contributed a valid bounding box; scene dimensions are undefined");
        }
    }

    fn primitive_alpha_mode(&self, primitive: &Primitive) -> AlphaMode {
        primitive
            .material
            .and_then(|material| self.materials.get(material))
            .map(|material| material.alpha_mode)
            .unwrap_or_default()
    }

    /// Visit the primitives of one alpha mode in hierarchy order. An
    /// invisible node contributes nothing itself but its children are
    /// still visited.
    pub fn for_each_primitive<F>(&self, alpha_mode: AlphaMode, visitor: &mut F)
    where
        F: FnMut(&Node, &Mesh, &Primitive),
    {
        for &root in &self.roots {
            self.visit_node_primitives(root, alpha_mode, visitor);
        }
    }

    fn visit_node_primitives<F>(&self, index: usize, alpha_mode: AlphaMode, visitor: &mut F)
    where
        F: FnMut(&Node, &Mesh, &Primitive),
    {
        let node = &self.nodes[index];
        if node.visible {
            if let Some(mesh_index) = node.mesh {
                let mesh = &self.meshes[mesh_index];
                for primitive in &mesh.primitives {
                    if self.primitive_alpha_mode(primitive) == alpha_mode {
                        visitor(node, mesh, primitive);
                    }
                }
            }
        }
        for &child in &node.children {
            self.visit_node_primitives(child, alpha_mode, visitor);
        }
    }

    /// Visit every visible primitive in draw order: all opaque primitives,
    /// then alpha-masked, then blended.
    pub fn draw<F>(&self, visitor: &mut F)
    where
        F: FnMut(&Node, &Mesh, &Primitive),
    {
        for alpha_mode in [AlphaMode::Opaque, AlphaMode::Mask, AlphaMode::Blend] {
            self.for_each_primitive(alpha_mode, visitor);
        }
    }
}

fn tex_coord(asset: &PrimitiveAsset, set: usize, vertex: usize) -> [f32; 2] {
    asset
        .tex_coords
        .get(set)
        .and_then(|coords| coords.get(vertex))
        .copied()
        .unwrap_or([0.0; 2])
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Quat, Vec3, Vec4};

    use crate::asset::animation::{
        AnimationAsset, AnimationChannelAsset, AnimationSamplerAsset, ChannelPath, Interpolation,
    };
    use crate::asset::document::DocumentAsset;
    use crate::asset::material::{AlphaMode, MaterialAsset};
    use crate::asset::mesh::MeshAsset;
    use crate::asset::node::{DecomposedTransform, NodeAsset, NodeTransform};
    use crate::asset::primitive::PrimitiveAsset;
    use crate::asset::skin::SkinAsset;

    use super::{LoadError, Model, MAX_JOINT_COUNT};

    fn triangle_primitive(material: Option<usize>) -> PrimitiveAsset {
        PrimitiveAsset {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: Some(vec![0, 1, 2]),
            material,
            ..Default::default()
        }
    }

    fn triangle_mesh() -> MeshAsset {
        MeshAsset {
            name: None,
            primitives: vec![triangle_primitive(None)],
        }
    }

    fn translated_node(translation: Vec3) -> NodeAsset {
        NodeAsset {
            transform: NodeTransform::Decomposed(DecomposedTransform {
                translation,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn world_matrix_accumulates_parent_chain() {
        let mut parent = translated_node(Vec3::new(1.0, 0.0, 0.0));
        parent.children = vec![1];
        let child = translated_node(Vec3::new(0.0, 1.0, 0.0));
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![parent, child],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();

        let root_world = model.world_matrix(0);
        assert_eq!(
            root_world.transform_point3(Vec3::ZERO),
            Vec3::new(1.0, 0.0, 0.0)
        );
        let child_world = model.world_matrix(1);
        assert_eq!(
            child_world.transform_point3(Vec3::ZERO),
            Vec3::new(1.0, 1.0, 0.0)
        );
        assert_eq!(model.nodes[1].parent, Some(0));
    }

    #[test]
    fn linear_translation_animation_moves_node() {
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![NodeAsset::default()],
            animations: vec![AnimationAsset {
                name: None,
                samplers: vec![AnimationSamplerAsset {
                    interpolation: Interpolation::Linear,
                    inputs: vec![0.0, 1.0],
                    outputs: vec![Vec4::ZERO, Vec4::new(10.0, 0.0, 0.0, 0.0)],
                }],
                channels: vec![AnimationChannelAsset {
                    path: ChannelPath::Translation,
                    node: 0,
                    sampler: 0,
                }],
            }],
            ..Default::default()
        };
        let mut model = Model::from_document(document).unwrap();
        assert_eq!(model.animations[0].start, 0.0);
        assert_eq!(model.animations[0].end, 1.0);

        model.update_animation(0, 0.5);
        model.update();
        assert_eq!(model.nodes[0].translation, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(
            model.world_matrix(0).transform_point3(Vec3::ZERO),
            Vec3::new(5.0, 0.0, 0.0)
        );
    }

    #[test]
    fn oversized_skin_is_rejected() {
        let joint_count = MAX_JOINT_COUNT + 1;
        let document = DocumentAsset {
            roots: (0..joint_count).collect(),
            nodes: (0..joint_count).map(|_| NodeAsset::default()).collect(),
            skins: vec![SkinAsset {
                joints: (0..joint_count).collect(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            Model::from_document(document).unwrap_err(),
            LoadError::TooManyJoints {
                count: joint_count,
                max: MAX_JOINT_COUNT,
            }
        );
    }

    #[test]
    fn bind_matrix_count_must_match_joints() {
        let document = DocumentAsset {
            roots: vec![0, 1],
            nodes: vec![NodeAsset::default(), NodeAsset::default()],
            skins: vec![SkinAsset {
                joints: vec![0, 1],
                inverse_bind_matrices: vec![Mat4::IDENTITY],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            Model::from_document(document).unwrap_err(),
            LoadError::BindMatrixCountMismatch {
                joints: 2,
                matrices: 1,
            }
        );
    }

    #[test]
    fn non_monotonic_keyframes_are_rejected() {
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![NodeAsset::default()],
            animations: vec![AnimationAsset {
                name: None,
                samplers: vec![AnimationSamplerAsset {
                    interpolation: Interpolation::Linear,
                    inputs: vec![0.0, 1.0, 1.0],
                    outputs: vec![Vec4::ZERO, Vec4::ZERO, Vec4::ZERO],
                }],
                channels: vec![],
            }],
            ..Default::default()
        };
        assert_eq!(
            Model::from_document(document).unwrap_err(),
            LoadError::NonMonotonicKeyframes
        );
    }

    #[test]
    fn nodes_sharing_a_mesh_get_separate_uniforms() {
        let mut first = translated_node(Vec3::new(1.0, 0.0, 0.0));
        first.mesh = Some(0);
        let mut second = translated_node(Vec3::new(-5.0, 0.0, 0.0));
        second.mesh = Some(0);
        let document = DocumentAsset {
            roots: vec![0, 1],
            nodes: vec![first, second],
            meshes: vec![triangle_mesh()],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();

        assert_eq!(model.meshes.len(), 2);
        let mut matrices = Vec::new();
        model.draw(&mut |node, mesh, _| {
            assert_eq!(mesh.uniform.matrix(), model.world_matrix(node.index));
            matrices.push(mesh.uniform.matrix());
        });
        assert_eq!(
            matrices,
            vec![
                Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
                Mat4::from_translation(Vec3::new(-5.0, 0.0, 0.0)),
            ]
        );
        // world boxes are per instance as well
        assert_eq!(model.meshes[0].world_bounds.min, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(model.meshes[1].world_bounds.min, Vec3::new(-5.0, 0.0, 0.0));
        // the geometry itself stays shared through the flat buffers
        assert_eq!(model.vertices.len(), 3);
    }

    #[test]
    fn node_claimed_by_two_parents_is_rejected() {
        let mut first = NodeAsset::default();
        first.children = vec![2];
        let mut second = NodeAsset::default();
        second.children = vec![2];
        let document = DocumentAsset {
            roots: vec![0, 1],
            nodes: vec![first, second, NodeAsset::default()],
            ..Default::default()
        };
        assert_eq!(
            Model::from_document(document).unwrap_err(),
            LoadError::InvalidHierarchy { node: 2 }
        );
    }

    #[test]
    fn root_listed_as_a_child_is_rejected() {
        let mut parent = NodeAsset::default();
        parent.children = vec![1];
        let document = DocumentAsset {
            roots: vec![0, 1],
            nodes: vec![parent, NodeAsset::default()],
            ..Default::default()
        };
        assert_eq!(
            Model::from_document(document).unwrap_err(),
            LoadError::InvalidHierarchy { node: 1 }
        );
    }

    #[test]
    fn child_cycle_is_rejected() {
        let mut first = NodeAsset::default();
        first.children = vec![2];
        let mut second = NodeAsset::default();
        second.children = vec![1];
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![NodeAsset::default(), first, second],
            ..Default::default()
        };
        assert_eq!(
            Model::from_document(document).unwrap_err(),
            LoadError::InvalidHierarchy { node: 1 }
        );
    }

    #[test]
    fn dimensions_stay_undefined_without_geometry() {
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![NodeAsset::default()],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();
        assert!(!model.dimensions.is_defined());
    }

    #[test]
    fn dimensions_come_from_mesh_nodes_only() {
        let mut mesh_node = translated_node(Vec3::new(1.0, 0.0, 0.0));
        mesh_node.mesh = Some(0);
        let document = DocumentAsset {
            roots: vec![0, 1, 2],
            nodes: vec![mesh_node, NodeAsset::default(), NodeAsset::default()],
            meshes: vec![triangle_mesh()],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();
        assert_eq!(model.dimensions.min, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(model.dimensions.max, Vec3::new(2.0, 1.0, 0.0));
        assert!(!model.nodes[1].bvh.valid);
    }

    #[test]
    fn draw_visits_alpha_modes_in_pass_order() {
        let material = |alpha_mode| MaterialAsset {
            alpha_mode,
            ..Default::default()
        };
        let mesh = MeshAsset {
            name: None,
            primitives: vec![
                triangle_primitive(Some(2)),
                triangle_primitive(Some(0)),
                triangle_primitive(Some(1)),
            ],
        };
        let mut node = NodeAsset::default();
        node.mesh = Some(0);
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![node],
            meshes: vec![mesh],
            materials: vec![
                material(AlphaMode::Opaque),
                material(AlphaMode::Mask),
                material(AlphaMode::Blend),
            ],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();

        let mut visited = Vec::new();
        model.draw(&mut |_, _, primitive| {
            visited.push(primitive.material.unwrap());
        });
        assert_eq!(visited, vec![0, 1, 2]);
    }

    #[test]
    fn invisible_node_skips_primitives_but_not_children() {
        let mut parent = NodeAsset::default();
        parent.mesh = Some(0);
        parent.children = vec![1];
        let mut child = NodeAsset::default();
        child.mesh = Some(0);
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![parent, child],
            meshes: vec![triangle_mesh()],
            ..Default::default()
        };
        let mut model = Model::from_document(document).unwrap();
        model.nodes[0].visible = false;

        let mut visits = 0;
        model.draw(&mut |node, _, _| {
            assert_eq!(node.index, 1);
            visits += 1;
        });
        assert_eq!(visits, 1);
    }

    #[test]
    fn primitive_indices_are_rebased_into_flat_buffers() {
        let mesh = MeshAsset {
            name: None,
            primitives: vec![triangle_primitive(None), triangle_primitive(None)],
        };
        let mut node = NodeAsset::default();
        node.mesh = Some(0);
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![node],
            meshes: vec![mesh],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();

        assert_eq!(model.vertices.len(), 6);
        assert_eq!(model.indices, vec![0, 1, 2, 3, 4, 5]);
        let second = &model.meshes[0].primitives[1];
        assert_eq!(second.first_index, 3);
        assert_eq!(second.index_count, 3);
        assert!(second.has_indices);
    }

    #[test]
    fn joint_matrices_land_in_the_mesh_uniform() {
        let mut mesh_node = NodeAsset::default();
        mesh_node.mesh = Some(0);
        mesh_node.skin = Some(0);
        mesh_node.children = vec![1];
        let joint = translated_node(Vec3::new(1.0, 0.0, 0.0));
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![mesh_node, joint],
            meshes: vec![triangle_mesh()],
            skins: vec![SkinAsset {
                joints: vec![1],
                inverse_bind_matrices: vec![Mat4::IDENTITY],
                ..Default::default()
            }],
            ..Default::default()
        };
        let model = Model::from_document(document).unwrap();

        let uniform = &model.meshes[0].uniform;
        assert_eq!(uniform.joint_count(), 1);
        assert_eq!(
            uniform.joint_matrix(0),
            Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
        );
        assert_eq!(uniform.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn explicit_matrix_node_ignores_animated_trs() {
        let mut node = NodeAsset::default();
        node.transform = NodeTransform::Matrix(Mat4::IDENTITY);
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![node],
            animations: vec![AnimationAsset {
                name: None,
                samplers: vec![AnimationSamplerAsset {
                    interpolation: Interpolation::Linear,
                    inputs: vec![0.0, 1.0],
                    outputs: vec![Vec4::ZERO, Vec4::new(3.0, 0.0, 0.0, 0.0)],
                }],
                channels: vec![AnimationChannelAsset {
                    path: ChannelPath::Translation,
                    node: 0,
                    sampler: 0,
                }],
            }],
            ..Default::default()
        };
        let mut model = Model::from_document(document).unwrap();
        model.update_animation(0, 1.0);
        model.update();
        assert_eq!(model.world_matrix(0), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_channel_updates_node_rotation() {
        let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let document = DocumentAsset {
            roots: vec![0],
            nodes: vec![NodeAsset::default()],
            animations: vec![AnimationAsset {
                name: Some("turn".to_owned()),
                samplers: vec![AnimationSamplerAsset {
                    interpolation: Interpolation::Linear,
                    inputs: vec![0.0, 1.0],
                    outputs: vec![
                        Vec4::new(0.0, 0.0, 0.0, 1.0),
                        Vec4::new(quarter.x, quarter.y, quarter.z, quarter.w),
                    ],
                }],
                channels: vec![AnimationChannelAsset {
                    path: ChannelPath::Rotation,
                    node: 0,
                    sampler: 0,
                }],
            }],
            ..Default::default()
        };
        let mut model = Model::from_document(document).unwrap();
        assert_eq!(model.animations[0].name, "turn");

        model.update_animation(0, 1.0);
        assert!((model.nodes[0].rotation.dot(quarter).abs() - 1.0).abs() < 1e-5);
    }
}
