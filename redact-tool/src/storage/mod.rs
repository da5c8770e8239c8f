use std::{io, sync::Arc};

use egui_regions::{OriginalRect, RegionTuple};
use futures::future::BoxFuture;
use image::DynamicImage;

mod file;
mod in_memory;

pub use file::FileStorage;
pub use in_memory::InMemoryStorage;

/// Identifier of an annotated image. File-backed storage uses the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(Arc<str>);

impl ImageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image plus the redaction regions persisted alongside it, in original-image
/// coordinates.
#[derive(Clone)]
pub struct ImageData {
    pub id: ImageId,
    pub image: DynamicImage,
    pub regions: Vec<RegionTuple>,
}

pub trait Storage {
    fn load_image(&self, id: &ImageId) -> BoxFuture<'static, io::Result<ImageData>>;
    fn store_regions(
        &self,
        id: ImageId,
        regions: Vec<OriginalRect>,
    ) -> BoxFuture<'static, io::Result<()>>;
}
