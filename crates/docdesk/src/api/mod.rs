//! Remote document store access.

pub mod client;
pub mod types;

pub use client::{DocumentApi, HttpDocumentApi};
pub use types::{DocumentContent, UploadRequest};
