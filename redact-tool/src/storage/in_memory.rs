use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use egui_regions::OriginalRect;
use futures::{future::BoxFuture, FutureExt};
use image::{DynamicImage, Rgba, RgbaImage};

use super::{ImageData, ImageId, Storage};

/// In-memory storage for tests and for running without any image on disk.
pub struct InMemoryStorage {
    data: Arc<Mutex<HashMap<ImageId, ImageData>>>,
}

impl InMemoryStorage {
    pub const DEMO_ID: &'static str = "checkerboard";

    pub fn new(items: impl IntoIterator<Item = ImageData>) -> Self {
        Self {
            data: Arc::new(Mutex::new(
                items.into_iter().map(|item| (item.id.clone(), item)).collect(),
            )),
        }
    }

    /// Storage pre-seeded with a generated checkerboard under
    /// [`InMemoryStorage::DEMO_ID`].
    pub fn demo() -> Self {
        let board = RgbaImage::from_fn(512, 512, |x, y| {
            if (x / 64 + y / 64) % 2 == 0 {
                Rgba([220, 220, 220, 255])
            } else {
                Rgba([120, 120, 120, 255])
            }
        });
        Self::new([ImageData {
            id: ImageId::from(Self::DEMO_ID),
            image: DynamicImage::ImageRgba8(board),
            regions: Vec::new(),
        }])
    }
}

impl Storage for InMemoryStorage {
    fn load_image(&self, id: &ImageId) -> BoxFuture<'static, io::Result<ImageData>> {
        let data = self
            .data
            .lock()
            .unwrap()
            .get(id)
            .map(ImageData::clone)
            .ok_or_else(|| io::Error::other(format!("unknown image id {id:?}")));
        std::future::ready(data).boxed()
    }

    fn store_regions(
        &self,
        id: ImageId,
        regions: Vec<OriginalRect>,
    ) -> BoxFuture<'static, io::Result<()>> {
        if let Some(entry) = self.data.lock().unwrap().get_mut(&id) {
            entry.regions = regions.into_iter().map(Into::into).collect();
        }
        std::future::ready(Ok(())).boxed()
    }
}
