//! Utility functions

use std::path::PathBuf;

pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 160 160"><defs><style>.c1{fill:#34d399}.c2{fill:#09090b}</style></defs><circle class="c1" cx="80" cy="80" r="72"/><path class="c2" d="M80 36 C52 52 44 84 58 110 C64 88 72 72 92 58 C76 76 66 94 62 114 C88 122 112 106 118 78 C122 58 108 42 80 36 Z"/></svg>"##;

/// Rasterize the logo SVG to a square image (sidebar logo and window icon).
pub fn rasterize_logo(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the application data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("EcoSort")
}

/// Format a file size as megabytes with exactly two decimal places
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_mebibytes_formats_exact() {
        assert_eq!(format_file_size(2_097_152), "2.00 MB");
    }

    #[test]
    fn small_remainder_rounds_away() {
        assert_eq!(format_file_size(1_048_576 + 512), "1.00 MB");
    }

    #[test]
    fn sub_megabyte_sizes_keep_the_suffix() {
        assert_eq!(format_file_size(0), "0.00 MB");
        assert_eq!(format_file_size(524_288), "0.50 MB");
    }
}
