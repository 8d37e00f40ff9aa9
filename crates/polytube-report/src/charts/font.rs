//! Locating a TTF for chart labels.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

/// Load the configured font, falling back to well-known system fonts.
///
/// Returns `None` when nothing usable is found; charts then render
/// without text.
#[must_use]
pub fn load_chart_font(configured: Option<&Path>) -> Option<FontVec> {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(system_font_candidates().iter().map(PathBuf::from));

    for path in candidates {
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "font candidate unreadable");
                continue;
            }
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                tracing::info!(path = %path.display(), "using font for chart labels");
                return Some(font);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "font candidate is not a usable font");
            }
        }
    }

    tracing::warn!("no usable chart font found; charts render without labels");
    None
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &["C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\segoeui.ttf"]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
    }
}
