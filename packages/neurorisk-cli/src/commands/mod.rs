pub mod fuse;
pub mod info;
pub mod network;
pub mod spectral;
pub mod validate;
