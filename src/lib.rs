// lib.rs

/// Contains the importer that turns a bundle folder of model documents,
/// textures and scripts into an `Aspect`.
pub mod io;

/// Contains the container field names shared by the encoder and the decoder.
pub(crate) mod shared;

/// Defines the aspect encoder.
pub mod encode;

/// Defines the aspect decoder.
pub mod decode;

/// Contains the shared definitions, native objects, and the byte coder.
pub mod core;

/// Contains the LEB128 and path helpers used across the crate.
pub(crate) mod utils;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::aspect::Aspect;
    pub use crate::core::metadata::Metadata;
    pub use crate::core::model_part::{Geometry, ModelPart, PartKind};
    pub use crate::core::script::Script;
    pub use crate::core::shared::{ConfigType, Vec3};
    pub use crate::core::texture::{Texture, TextureTable};
    pub use crate::core::bit_coder::{ByteReader, ByteWriter};
    pub use crate::encode::{self, encode};
    pub use crate::decode::{self, decode};
    pub use crate::io::bundle::{self, import, import_async};
}
