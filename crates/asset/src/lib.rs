//! Asset loading: OBJ parsing and mesh normalization into renderer-ready
//! buffers.

pub mod mesh;
pub mod normalize;
pub mod obj;

pub use mesh::{Face, MeshData, MeshVertex, RawMesh};
pub use normalize::{MeshError, NormalPolicy, NormalizeConfig};
