use std::{io, path::PathBuf};

use eframe::egui;
use log::info;

use super::RedactApp;
use crate::storage::{FileStorage, ImageId, InMemoryStorage, Storage};

pub fn run_native() -> eframe::Result {
    env_logger::init();

    let config = match std::fs::File::open("config.json") {
        Ok(f) => serde_json::from_reader(f).map_err(|e| eframe::Error::AppCreation(Box::new(e)))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => crate::Config::default(),
        Err(e) => Err(eframe::Error::AppCreation(Box::new(e)))?,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.viewport),
        ..Default::default()
    };

    let image = std::env::args().nth(1).map(PathBuf::from).or_else(|| config.image.clone());
    let (storage, image_id): (Box<dyn Storage>, ImageId) = match image {
        Some(path) => (
            Box::new(FileStorage::new()),
            ImageId::from(path.to_string_lossy().into_owned()),
        ),
        None => (
            Box::new(InMemoryStorage::demo()),
            ImageId::from(InMemoryStorage::DEMO_ID),
        ),
    };

    info!("run with config: {config:?}");
    eframe::run_native(
        "Redact Tool",
        options,
        Box::new(move |cc| Ok(Box::new(RedactApp::new(cc, &config, storage, image_id)))),
    )
}
