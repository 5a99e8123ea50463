//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

// Stacked cards with a title bar, used for the sidebar logo and window icon
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect x="14" y="6" width="44" height="36" rx="5" fill="#27272a" stroke="#09090b"/><rect x="6" y="18" width="44" height="40" rx="5" fill="#fff" stroke="#09090b"/><rect x="12" y="25" width="16" height="12" rx="2" fill="#2dd4bf"/><rect x="32" y="26" width="12" height="3" rx="1.5" fill="#3f3f46"/><rect x="32" y="32" width="9" height="3" rx="1.5" fill="#71717a"/><rect x="12" y="43" width="32" height="3" rx="1.5" fill="#71717a"/><rect x="12" y="49" width="24" height="3" rx="1.5" fill="#a1a1aa"/></svg>"##;

/// Rasterize the logo SVG at the given width, preserving aspect ratio.
pub fn rasterize_logo(width: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), width, height))
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

/// Get the app data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Single-line preview of a longer text, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && line.len() == text.len() {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_rasterizes_to_rgba() {
        assert!(LOGO_SVG.trim_end().ends_with("</svg>"));
        let (pixels, w, h) = rasterize_logo(64).unwrap();
        assert_eq!(w, 64);
        assert_eq!(h, 64);
        assert_eq!(pixels.len(), (w * h * 4) as usize);
        assert!(pixels.chunks(4).any(|p| p[3] == 255));
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly", 7), "exactly");
        assert_eq!(truncate_chars("ünïcödé text", 5), "ünïcö…");
        assert_eq!(truncate_chars("first\nsecond", 20), "first…");
    }
}
