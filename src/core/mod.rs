pub mod aspect;
pub mod bit_coder;
pub mod metadata;
pub mod model_part;
pub mod script;
pub mod shared;
pub mod tag;
pub mod texture;
