// Record schema contract and the untyped document layer the stores speak.

pub mod document;
pub mod traits;

pub use document::{Document, ID_FIELD};
pub use traits::CRUDResource;
