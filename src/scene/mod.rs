pub mod animation;
pub mod bounds;
pub mod mesh;
pub mod model;
pub mod node;
pub mod skin;
pub mod vertex;
