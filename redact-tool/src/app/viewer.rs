use egui::{self, Color32, Pos2, Rect, Sense, TextureHandle};

/// Paints `texture` scaled to fit the remaining space, aspect preserved and
/// centered. Returns the drag-sensing response covering the viewport and the
/// rect the image actually occupies on screen, which doubles as the overlay
/// surface: its size is the surface size and its corner the surface origin.
pub(super) fn image_pane(ui: &mut egui::Ui, texture: &TextureHandle) -> (egui::Response, Rect) {
    let viewport = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(viewport, Sense::drag());
    let painter = ui.painter().with_clip_rect(viewport);

    let image_size = texture.size_vec2();
    let fit_scale = (viewport.width() / image_size.x).min(viewport.height() / image_size.y);
    let display_size = image_size * fit_scale;
    let origin = viewport.min + (viewport.size() - display_size) * 0.5;
    let display_rect = Rect::from_min_size(origin, display_size);

    let uv = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0));
    painter.image(texture.id(), display_rect, uv, Color32::WHITE);

    (response, display_rect)
}
