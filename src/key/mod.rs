pub mod maker;
pub mod value;

pub use maker::{CacheKey, HashedKey, KeyMaker, KeyPart, PlainKey, TypedKey};
pub use value::{ArgType, ArgValue, Args, ObjectRef};
