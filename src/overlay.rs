// overlay.rs — egui 覆盖层：欢迎页文字、全景页信息面板 / 加载 / 错误 / 署名

use egui::{Align2, Color32, FontFamily, FontId, RichText, Sense, Stroke};
use skyline_panorama::i18n::{tr, tr_with};
use skyline_panorama::landing::{LandingScreen, HINT_DELAY, NOTE_DELAY};
use skyline_panorama::texture::LoadError;
use std::path::PathBuf;
use std::time::Instant;

const SERIF: &str = "serif";

#[derive(Debug)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(LoadError),
}

fn serif_family() -> FontFamily {
    FontFamily::Name(SERIF.into())
}

// 找不到衬线字体时 serif 族退回默认字体，保证该字体族始终存在
pub fn install_fonts(ctx: &egui::Context) {
    fn try_load_font_from_path(path: &std::path::Path) -> Option<Vec<u8>> {
        let bytes = std::fs::read(path).ok()?;
        ab_glyph::FontRef::try_from_slice(&bytes).ok()?;
        Some(bytes)
    }

    let mut candidates: Vec<PathBuf> = Vec::new();

    // 1) 系统字体目录（跨平台），Georgia / Garamond 优先
    if cfg!(windows) {
        let win_fonts = PathBuf::from(r"C:\Windows\Fonts");
        for f in ["georgia.ttf", "GARA.TTF", "times.ttf"] {
            candidates.push(win_fonts.join(f));
        }
    } else if cfg!(target_os = "macos") {
        for p in [
            "/System/Library/Fonts/Supplemental/Georgia.ttf",
            "/Library/Fonts/Georgia.ttf",
            "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
        ] {
            candidates.push(PathBuf::from(p));
        }
    } else {
        for p in [
            "/usr/share/fonts/truetype/msttcorefonts/Georgia.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
            "/usr/share/fonts/TTF/DejaVuSerif.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSerif-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSerif-Regular.ttf",
        ] {
            candidates.push(PathBuf::from(p));
        }
    }

    // 2) assets/fonts（exe 同目录 / 工作目录）
    let asset_file = "Serif-Regular.ttf";
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join("assets").join("fonts").join(asset_file));
        }
    }
    candidates.push(PathBuf::from("assets").join("fonts").join(asset_file));

    let chosen = candidates
        .into_iter()
        .find_map(|p| try_load_font_from_path(&p).map(|bytes| (p, bytes)));

    let mut fonts = egui::FontDefinitions::default();
    let mut serif_stack = fonts
        .families
        .get(&FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();

    match chosen {
        Some((font_path, font_bytes)) => {
            log::info!("{}", tr_with("font.using", &[("path", font_path.display().to_string())]));
            fonts
                .font_data
                .insert(SERIF.to_owned(), egui::FontData::from_owned(font_bytes));
            serif_stack.insert(0, SERIF.to_owned());
        }
        None => log::warn!("{}", tr("font.not_found")),
    }

    fonts.families.insert(serif_family(), serif_stack);
    ctx.set_fonts(fonts);
}

fn faded(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

const GRAIN_SPECKS: usize = 1500;
const GRAIN_FPS: f64 = 24.0;

// xorshift，只用于颗粒噪点
fn grain_specks(seed: u64, width: f32, height: f32, count: usize) -> Vec<egui::Pos2> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u64 << 24) as f32
    };
    (0..count)
        .map(|_| egui::pos2(next() * width, next() * height))
        .collect()
}

// 胶片颗粒：覆盖整个欢迎页的微弱噪点层
fn paint_grain(ctx: &egui::Context) {
    let screen = ctx.screen_rect();
    let seed = (ctx.input(|i| i.time) * GRAIN_FPS) as u64;
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("landing_grain"),
    ));
    for p in grain_specks(seed, screen.width(), screen.height(), GRAIN_SPECKS) {
        painter.rect_filled(
            egui::Rect::from_min_size(screen.min + p.to_vec2(), egui::vec2(1.0, 1.0)),
            0.0,
            Color32::from_white_alpha(10),
        );
    }
}

// 返回本帧按钮是否被点击
pub fn draw_landing(ctx: &egui::Context, landing: &LandingScreen, now: Instant) -> bool {
    let opacity = landing.content_opacity(now);
    let offset = landing.content_offset(now);
    let mut clicked = false;

    paint_grain(ctx);

    egui::Area::new("landing_content")
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, offset))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(tr("landing.headline"))
                        .family(serif_family())
                        .size(64.0)
                        .color(faded(Color32::WHITE, opacity)),
                );
                ui.add_space(24.0);

                // 装饰线
                let (rect, _) = ui.allocate_exact_size(egui::vec2(96.0, 1.0), Sense::hover());
                ui.painter().line_segment(
                    [rect.left_center(), rect.right_center()],
                    Stroke::new(1.0, faded(Color32::from_white_alpha(102), opacity)),
                );
                ui.add_space(32.0);

                ui.label(
                    RichText::new(tr("landing.subtext"))
                        .size(22.0)
                        .color(faded(Color32::from_white_alpha(230), opacity)),
                );
                ui.add_space(48.0);

                clicked = cta_button(ui, &tr("landing.cta"), opacity);
            });
        });

    let hint = landing.element_opacity(now, HINT_DELAY);
    egui::Area::new("landing_hint")
        .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -48.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(tr("landing.hint"))
                        .size(13.0)
                        .color(faded(Color32::from_white_alpha(102), hint)),
                );
                let (rect, _) = ui.allocate_exact_size(egui::vec2(1.0, 48.0), Sense::hover());
                ui.painter().line_segment(
                    [rect.center_top(), rect.center_bottom()],
                    Stroke::new(1.0, faded(Color32::from_white_alpha(102), hint)),
                );
            });
        });

    let note = landing.element_opacity(now, NOTE_DELAY);
    egui::Area::new("landing_note")
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-32.0, -32.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                ui.label(
                    RichText::new(tr("landing.note"))
                        .italics()
                        .size(13.0)
                        .color(faded(Color32::from_white_alpha(153), note)),
                );
            });
        });

    clicked
}

// 悬停时白色背景从左向右填满，文字反色
fn cta_button(ui: &mut egui::Ui, label: &str, opacity: f32) -> bool {
    let (slot, response) = ui.allocate_exact_size(egui::vec2(280.0, 56.0), Sense::click());
    let t = ui
        .ctx()
        .animate_bool_with_time(response.id, response.hovered(), 0.5);
    // 悬停放大到 1.05
    let rect = egui::Rect::from_center_size(slot.center(), slot.size() * (1.0 + 0.05 * t));

    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, faded(Color32::from_white_alpha(13), opacity));
    if t > 0.0 {
        let mut fill = rect;
        fill.set_width(rect.width() * t);
        painter.rect_filled(fill, 0.0, faded(Color32::WHITE, opacity));
    }
    let border = if response.hovered() {
        Color32::WHITE
    } else {
        Color32::from_white_alpha(153)
    };
    painter.rect_stroke(rect, 0.0, Stroke::new(2.0, faded(border, opacity)));

    let gray = (255.0 * (1.0 - t)).round() as u8;
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(18.0),
        faded(Color32::from_gray(gray), opacity),
    );

    response.clicked()
}

fn panel() -> egui::Frame {
    egui::Frame::none()
        .fill(Color32::from_black_alpha(178))
        .rounding(8.0)
        .inner_margin(egui::Margin::same(16.0))
}

/// Viewer overlays: info panel, loading indicator, error panel and credits.
pub fn draw_viewer(ctx: &egui::Context, status: &LoadStatus) {
    egui::Area::new("viewer_info")
        .anchor(Align2::LEFT_TOP, egui::vec2(20.0, 20.0))
        .interactable(false)
        .show(ctx, |ui| {
            panel().show(ui, |ui| {
                ui.set_max_width(360.0);
                ui.label(RichText::new(tr("viewer.title")).size(20.0).strong().color(Color32::WHITE));
                ui.add_space(8.0);
                ui.label(RichText::new(tr("viewer.hint.drag")).size(14.0).color(Color32::WHITE));
                ui.label(RichText::new(tr("viewer.hint.zoom")).size(14.0).color(Color32::WHITE));
            });
        });

    match status {
        LoadStatus::Loading => {
            egui::Area::new("viewer_loading")
                .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .order(egui::Order::Foreground)
                .interactable(false)
                .show(ctx, |ui| {
                    panel()
                        .fill(Color32::from_black_alpha(204))
                        .inner_margin(egui::Margin::symmetric(32.0, 16.0))
                        .show(ui, |ui| {
                            ui.label(RichText::new(tr("viewer.loading")).size(20.0).color(Color32::WHITE));
                        });
                });
        }
        LoadStatus::Failed(err) => {
            let (file, folder) = err.remediation();
            egui::Area::new("viewer_error")
                .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    panel()
                        .fill(Color32::from_rgba_unmultiplied(127, 29, 29, 230))
                        .inner_margin(egui::Margin::symmetric(32.0, 16.0))
                        .show(ui, |ui| {
                            ui.set_max_width(420.0);
                            ui.label(RichText::new(tr("error.title")).size(18.0).strong().color(Color32::WHITE));
                            ui.add_space(8.0);
                            ui.label(RichText::new(err.to_string()).size(14.0).color(Color32::WHITE));
                            ui.add_space(8.0);
                            ui.label(
                                RichText::new(tr_with(
                                    "error.remediation",
                                    &[("file", file), ("folder", folder)],
                                ))
                                .size(12.0)
                                .color(Color32::WHITE),
                            );
                        });
                });
        }
        LoadStatus::Ready => {}
    }

    egui::Area::new("viewer_credits")
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-20.0, -20.0))
        .interactable(false)
        .show(ctx, |ui| {
            panel().inner_margin(egui::Margin::same(12.0)).show(ui, |ui| {
                ui.label(RichText::new(tr("viewer.credits")).size(12.0).color(Color32::WHITE));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grain_stays_on_screen_and_changes_per_frame() {
        let a = grain_specks(7, 1280.0, 720.0, 500);
        assert_eq!(a.len(), 500);
        assert!(a.iter().all(|p| (0.0..1280.0).contains(&p.x) && (0.0..720.0).contains(&p.y)));
        assert_eq!(a, grain_specks(7, 1280.0, 720.0, 500));
        assert_ne!(a, grain_specks(8, 1280.0, 720.0, 500));
    }

    #[test]
    fn faded_scales_alpha() {
        assert_eq!(faded(Color32::WHITE, 0.0).a(), 0);
        assert_eq!(faded(Color32::WHITE, 1.0), Color32::WHITE);
    }
}
