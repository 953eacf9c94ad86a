pub mod host;
pub mod node;
pub mod scene;

pub use host::{GraphicsHost, GraphicsOp, HeadlessGraphics, TextureId};
pub use node::{NodeAnchor, SceneNode};
pub use scene::Scene;
