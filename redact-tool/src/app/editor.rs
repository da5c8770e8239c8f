use std::{
    cell::{Cell, RefCell},
    io,
    rc::Rc,
};

use egui::{self, Color32, ColorImage, TextureHandle, TextureOptions};
use egui_regions::{RegionSelector, RegionTuple, ShapeOverlay, SharedSurface, Surface};
use image::GenericImageView;
use log::debug;

use crate::jobs::UiFuture;
use crate::storage::{ImageData, ImageId, Storage};

pub(crate) enum EditorEvent {
    Logout,
}

/// Annotation screen: the loaded image with the region selector bound to a
/// [`ShapeOverlay`] stretched over its displayed rect.
pub(crate) struct EditorScreen {
    pub(super) image_state: ImageState,
    pub(super) selector: RegionSelector,
    pub(super) overlay: Rc<RefCell<ShapeOverlay>>,
    /// Set from the selector's change listener; drives the Save button.
    pub(super) dirty: Rc<Cell<bool>>,
    /// Regions loaded from storage, applied once the overlay has a real size.
    pending_regions: Option<Vec<RegionTuple>>,
    last_pointer: Option<egui::Pos2>,
    pub(super) save_job: UiFuture<io::Result<()>>,
}

#[allow(clippy::large_enum_variant)]
pub(super) enum ImageState {
    NotLoaded,
    Loading(UiFuture<io::Result<ImageData>>),
    Loaded(LoadedImage),
    Error(String),
}

pub(super) struct LoadedImage {
    pub(super) id: ImageId,
    pub(super) texture: TextureHandle,
}

impl EditorScreen {
    pub fn new() -> Self {
        let overlay = Rc::new(RefCell::new(ShapeOverlay::new(0, 0)));
        let mut selector = RegionSelector::new();
        let surface: SharedSurface = overlay.clone();
        selector.attach(surface);

        let dirty = Rc::new(Cell::new(false));
        let changed = dirty.clone();
        selector.on_change(move |regions| {
            debug!("region list changed: {} entries", regions.len());
            changed.set(true);
        });

        Self {
            image_state: ImageState::NotLoaded,
            selector,
            overlay,
            dirty,
            pending_regions: None,
            last_pointer: None,
            save_job: UiFuture::ready(Ok(())),
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        storage: &dyn Storage,
        image_id: &ImageId,
    ) -> Option<EditorEvent> {
        self.advance_image_state(ui.ctx(), storage, image_id);
        let event = self.menu_ui(ui, storage);

        let texture = match &self.image_state {
            ImageState::Loaded(image) => Some(image.texture.clone()),
            _ => None,
        };
        if let Some(texture) = texture {
            let (response, display_rect) = super::viewer::image_pane(ui, &texture);
            self.sync_overlay(display_rect);
            self.forward_pointer_events(&response, display_rect.min);
            self.overlay.borrow().paint(ui.painter(), display_rect.min);
        } else if let ImageState::Error(error) = &self.image_state {
            ui.label(format!("Error: {error}"));
        } else {
            ui.spinner();
        }

        event
    }

    fn advance_image_state(
        &mut self,
        ctx: &egui::Context,
        storage: &dyn Storage,
        image_id: &ImageId,
    ) {
        match &mut self.image_state {
            ImageState::NotLoaded => {
                self.image_state = ImageState::Loading(UiFuture::new(storage.load_image(image_id)));
            }
            ImageState::Loading(job) => {
                if let Some(result) = job.take() {
                    self.image_state = match result {
                        Ok(data) => {
                            let (width, height) = data.image.dimensions();
                            self.selector.set_original_size(width, height);
                            self.pending_regions = Some(data.regions);
                            ImageState::Loaded(LoadedImage {
                                id: data.id,
                                texture: upload_texture(ctx, &data.image),
                            })
                        }
                        Err(e) => ImageState::Error(e.to_string()),
                    };
                }
            }
            ImageState::Loaded(_) | ImageState::Error(_) => {}
        }
    }

    /// Keeps the overlay's surface size in sync with the displayed image rect
    /// and applies regions that waited for the first real size.
    fn sync_overlay(&mut self, display_rect: egui::Rect) {
        let size = (
            display_rect.width().round() as u32,
            display_rect.height().round() as u32,
        );
        if self.overlay.borrow().size() != size {
            self.overlay.borrow_mut().set_size(size.0, size.1);
            self.selector.render();
        }

        if let Some(regions) = self.pending_regions.take() {
            self.selector.set_regions(regions);
            // freshly loaded regions are not unsaved work
            self.dirty.set(false);
        }
    }

    fn forward_pointer_events(&mut self, response: &egui::Response, origin: egui::Pos2) {
        let to_surface = |pos: egui::Pos2| pos - origin.to_vec2();
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.last_pointer = Some(pos);
                self.selector.pointer_down(to_surface(pos));
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.last_pointer = Some(pos);
                self.selector.pointer_move(to_surface(pos));
            }
        } else if response.drag_stopped() {
            if let Some(pos) = response.interact_pointer_pos().or(self.last_pointer.take()) {
                self.selector.pointer_up(to_surface(pos));
            }
            self.last_pointer = None;
        }
    }
}

fn upload_texture(ctx: &egui::Context, image: &image::DynamicImage) -> TextureHandle {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba
        .pixels()
        .map(|&image::Rgba([r, g, b, a])| Color32::from_rgba_unmultiplied(r, g, b, a))
        .collect();
    ctx.load_texture(
        "image",
        ColorImage { size, pixels },
        TextureOptions {
            magnification: egui::TextureFilter::Nearest,
            ..Default::default()
        },
    )
}
