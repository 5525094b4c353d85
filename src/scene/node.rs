use glam::{Mat4, Quat, Vec3};

use super::bounds::BoundingBox;

/// One node of the scene hierarchy. Nodes live in the model's arena;
/// `parent` and `children` are indices into it, and `parent` is a
/// non-owning back-reference used only for upward matrix accumulation.
#[derive(Debug, Clone)]
pub struct Node {
    pub index: usize,
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Explicit transform override. When set, it is authoritative and the
    /// TRS fields are ignored; such a node must not be animated.
    pub matrix: Option<Mat4>,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub visible: bool,
    pub bvh: BoundingBox,
    pub aabb: BoundingBox,
}

impl Node {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            parent: None,
            children: Vec::new(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: None,
            mesh: None,
            skin: None,
            visible: true,
            bvh: BoundingBox::default(),
            aabb: BoundingBox::default(),
        }
    }

    /// Explicit matrix wins; otherwise translation, rotation and scale
    /// composed in that order.
    pub fn local_matrix(&self) -> Mat4 {
        match self.matrix {
            Some(matrix) => matrix,
            None => {
                Mat4::from_translation(self.translation)
                    * Mat4::from_quat(self.rotation)
                    * Mat4::from_scale(self.scale)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Quat, Vec3};

    use super::Node;

    #[test]
    fn local_matrix_composes_trs_in_order() {
        let mut node = Node::new(0);
        node.translation = Vec3::new(1.0, 2.0, 3.0);
        node.rotation = Quat::from_rotation_y(0.5);
        node.scale = Vec3::new(2.0, 2.0, 2.0);
        let expected = Mat4::from_translation(node.translation)
            * Mat4::from_quat(node.rotation)
            * Mat4::from_scale(node.scale);
        assert_eq!(node.local_matrix(), expected);
    }

    #[test]
    fn explicit_matrix_is_returned_verbatim() {
        let mut node = Node::new(0);
        node.translation = Vec3::new(5.0, 5.0, 5.0);
        let explicit = Mat4::from_scale(Vec3::new(0.5, 0.5, 0.5));
        node.matrix = Some(explicit);
        assert_eq!(node.local_matrix(), explicit);
    }
}
