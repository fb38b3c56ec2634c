//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use eframe::egui;

/// Render a colored pill badge for a waste category
pub fn trash_type_badge(ui: &mut egui::Ui, label: &str) {
    let (bg, fg) = theme::trash_type_colors(label);
    egui::Frame::new()
        .fill(bg)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, fg.gamma_multiply(0.4)))
        .corner_radius(theme::RADIUS_LARGE)
        .inner_margin(egui::Margin::symmetric(10, 4))
        .show(ui, |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(label.to_uppercase())
                        .size(theme::FONT_SMALL)
                        .color(fg),
                )
                .selectable(false),
            );
        });
}

/// Render a small confidence bar with a percentage label
pub fn confidence_bar(ui: &mut egui::Ui, confidence: f32) {
    let fraction = confidence.clamp(0.0, 1.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(110.0, 6.0), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, 3.0, theme::BG_SURFACE);
        let fill = egui::Rect::from_min_size(
            rect.min,
            egui::vec2(rect.width() * fraction, rect.height()),
        );
        let color = if fraction < 0.5 {
            theme::STATUS_WARNING
        } else {
            theme::STATUS_SUCCESS
        };
        painter.rect_filled(fill, 3.0, color);
    }

    ui.add(
        egui::Label::new(
            egui::RichText::new(format!("{:.2}%", fraction * 100.0))
                .size(theme::FONT_SECTION)
                .color(theme::TEXT_MUTED),
        )
        .selectable(false),
    );
}

/// Paint a dashed border around a rect (the drop-zone outline)
pub fn dashed_border(painter: &egui::Painter, rect: egui::Rect, color: egui::Color32) {
    let stroke = egui::Stroke::new(theme::STROKE_MEDIUM, color);
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    for pair in corners.windows(2) {
        painter.extend(egui::Shape::dashed_line(pair, stroke, 6.0, 5.0));
    }
}
