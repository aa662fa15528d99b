//! Filesystem storage for uploaded media.

mod cap_std_blob_store;

pub use cap_std_blob_store::CapStdBlobStore;
