//! Photo and thumbnail loading

use super::App;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Longest texture side uploaded to the GPU; larger photos are downscaled.
pub const MAX_TEXTURE_SIDE: u32 = 2048;

/// Load state of one photo URL.
pub enum ImageSlot {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

/// Decoded photo sent back from the runtime.
pub struct LoadedImage {
    pub url: String,
    pub result: Result<egui::ColorImage, String>,
}

/// Decode image bytes into straight-alpha RGBA, downscaling oversized photos.
pub fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > MAX_TEXTURE_SIDE || img.height() > MAX_TEXTURE_SIDE {
        img = img.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE);
    }
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Store a finished load. Slots pruned while the load was running stay gone.
fn store_loaded(cache: &mut HashMap<String, ImageSlot>, url: &str, slot: ImageSlot) -> bool {
    match cache.get_mut(url) {
        Some(existing) => {
            *existing = slot;
            true
        }
        None => false,
    }
}

/// Keep only the photos in `shown`. Returns how many were dropped.
fn retain_shown(cache: &mut HashMap<String, ImageSlot>, shown: &HashSet<&str>) -> usize {
    let before = cache.len();
    cache.retain(|url, _| shown.contains(url.as_str()));
    before - cache.len()
}

impl App {
    /// Current state of `url`, starting a background load the first time it is asked for.
    pub fn photo(&mut self, ctx: &egui::Context, url: &str) -> &ImageSlot {
        if !self.image_cache.contains_key(url) {
            self.start_photo_load(ctx, url);
        }
        self.image_cache.entry(url.to_string()).or_insert(ImageSlot::Loading)
    }

    fn start_photo_load(&mut self, ctx: &egui::Context, url: &str) {
        self.image_cache.insert(url.to_string(), ImageSlot::Loading);

        let client = self.client.clone();
        let tx = self.image_tx.clone();
        let ctx = ctx.clone();
        let url = url.to_string();
        debug!(url = %url, "Loading photo");

        self.runtime.spawn(async move {
            let result = match client.fetch_photo(&url).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || decode_image(&bytes))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|decoded| decoded.map_err(|e| e.to_string())),
                Err(e) => Err(e.to_string()),
            };
            if let Err(e) = &result {
                warn!(url = %url, error = %e, "Failed to load photo");
            }
            tx.send(LoadedImage { url, result }).ok();
            ctx.request_repaint();
        });
    }

    /// Upload photos decoded since the last frame.
    pub fn poll_images(&mut self, ctx: &egui::Context) {
        while let Ok(loaded) = self.image_rx.try_recv() {
            let slot = match loaded.result {
                Ok(image) => ImageSlot::Ready(ctx.load_texture(
                    loaded.url.clone(),
                    image,
                    egui::TextureOptions::LINEAR,
                )),
                Err(_) => ImageSlot::Failed,
            };
            if !store_loaded(&mut self.image_cache, &loaded.url, slot) {
                debug!(url = %loaded.url, "Dropping photo no longer shown");
            }
        }
    }

    /// Release textures of photos the current list and detail no longer show.
    pub fn prune_images(&mut self) {
        let shown = self.browser.photo_urls();
        let dropped = retain_shown(&mut self.image_cache, &shown);
        if dropped > 0 {
            debug!(dropped, kept = self.image_cache.len(), "Pruned photo cache");
        }
    }

    /// Forget every cached photo, e.g. after the service root changed.
    pub fn clear_images(&mut self) {
        self.image_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let image = decode_image(&png(4, 2)).unwrap();
        assert_eq!(image.size, [4, 2]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn downscales_large_photos() {
        let image = decode_image(&png(MAX_TEXTURE_SIDE * 2, 8)).unwrap();
        assert_eq!(image.size[0], MAX_TEXTURE_SIDE as usize);
        assert!(image.size[1] <= 8);
    }

    #[test]
    fn pruning_keeps_only_shown_photos() {
        let mut cache = HashMap::new();
        cache.insert("a.png".to_string(), ImageSlot::Failed);
        cache.insert("b.png".to_string(), ImageSlot::Loading);
        cache.insert("c.png".to_string(), ImageSlot::Loading);

        let shown: HashSet<&str> = ["b.png", "z.png"].into_iter().collect();
        assert_eq!(retain_shown(&mut cache, &shown), 2);
        assert_eq!(cache.len(), 1);
        assert!(matches!(cache.get("b.png"), Some(ImageSlot::Loading)));
    }

    #[test]
    fn late_results_for_pruned_photos_are_dropped() {
        let mut cache = HashMap::new();
        cache.insert("kept.png".to_string(), ImageSlot::Loading);

        assert!(store_loaded(&mut cache, "kept.png", ImageSlot::Failed));
        assert!(matches!(cache.get("kept.png"), Some(ImageSlot::Failed)));
        assert!(!store_loaded(&mut cache, "pruned.png", ImageSlot::Failed));
        assert!(!cache.contains_key("pruned.png"));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
