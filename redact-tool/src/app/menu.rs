use egui_regions::RegionTuple;

use super::editor::{EditorEvent, EditorScreen, ImageState};
use crate::jobs::UiFuture;
use crate::storage::Storage;

const ICON_SAVE: &str = "\u{1F4BE}";

impl EditorScreen {
    pub(super) fn menu_ui(&mut self, ui: &mut egui::Ui, storage: &dyn Storage) -> Option<EditorEvent> {
        let mut event = None;
        ui.horizontal(|ui| {
            let mut editing = self.selector.editing_enabled();
            if ui.toggle_value(&mut editing, "Edit").changed() {
                self.selector.enable_editing(editing);
            }

            if ui.button("Clear").clicked() {
                self.selector.set_regions(Vec::<RegionTuple>::new());
                // replacement with an empty list never notifies; flag by hand
                self.dirty.set(true);
            }

            ui.scope(|ui| {
                if !self.dirty.get() {
                    ui.disable();
                }
                if ui
                    .button(ICON_SAVE)
                    .on_hover_text("Save regions")
                    .clicked()
                {
                    if let ImageState::Loaded(image) = &self.image_state {
                        self.dirty.set(false);
                        self.save_job = UiFuture::new(
                            storage.store_regions(image.id.clone(), self.selector.regions()),
                        );
                    }
                }
            });
            if let Some(Err(e)) = self.save_job.poll() {
                ui.label(format!("Error during save: {e}"));
            }

            ui.label(format!("{} regions", self.selector.surface_regions().len()));

            if ui.button("Log out").clicked() {
                event = Some(EditorEvent::Logout);
            }
        });
        event
    }
}
