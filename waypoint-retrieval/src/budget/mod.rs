pub mod packer;

pub use packer::{pack, PackedContext};
