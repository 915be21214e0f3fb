//! Data models shared across the pipeline.

pub mod config;
pub mod page;

pub use config::Pdf2DxfConfig;
pub use page::PageDescriptor;
