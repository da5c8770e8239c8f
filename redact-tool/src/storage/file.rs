use std::{io, path::PathBuf};

use egui_regions::OriginalRect;
use futures::{future::BoxFuture, FutureExt};
use log::info;

use super::{ImageData, ImageId, Storage};

/// Stores region lists as JSON next to the image they belong to
/// (`<stem>.regions.json`), in original-image coordinates.
#[derive(Default)]
pub struct FileStorage;

impl FileStorage {
    pub fn new() -> Self {
        Self
    }

    fn regions_path(id: &ImageId) -> io::Result<PathBuf> {
        let image_path = std::path::Path::new(id.as_str());

        let stem = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("image path has no filename"))?;
        let dir = image_path
            .parent()
            .ok_or_else(|| io::Error::other("image path has no parent directory"))?;

        Ok(dir.join(format!("{stem}.regions.json")))
    }

    fn load_image_blocking(id: ImageId) -> io::Result<ImageData> {
        let bytes = std::fs::read(id.as_str())?;
        let image = image::load_from_memory(&bytes).map_err(io::Error::other)?;

        let regions = match std::fs::read(Self::regions_path(&id)?) {
            Ok(raw) => serde_json::from_slice(&raw).map_err(io::Error::other)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        Ok(ImageData { id, image, regions })
    }
}

impl Storage for FileStorage {
    fn load_image(&self, id: &ImageId) -> BoxFuture<'static, io::Result<ImageData>> {
        let id = id.clone();
        let (tx, rx) = futures::channel::oneshot::channel();
        std::thread::spawn(move || {
            let _ = tx.send(Self::load_image_blocking(id));
        });
        async move { rx.await.map_err(io::Error::other)? }.boxed()
    }

    fn store_regions(
        &self,
        id: ImageId,
        regions: Vec<OriginalRect>,
    ) -> BoxFuture<'static, io::Result<()>> {
        let path = Self::regions_path(&id);

        async move {
            let path = path?;
            info!("storing {} regions at {path:?}", regions.len());
            if regions.is_empty() {
                match std::fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            } else {
                let file = std::fs::File::create(path)?;
                serde_json::to_writer(file, &regions).map_err(io::Error::other)?;
            }
            Ok(())
        }
        .boxed()
    }
}
