//! App module - contains the main application state and logic

mod context_menu;
mod fetch;
mod images;
mod views;

pub use images::ImageSlot;

use crate::browser::ContentBrowser;
use crate::client::ContentClient;
use crate::constants::*;
use crate::settings::Settings;
use crate::theme;
use eframe::egui;
use fetch::ServiceReply;
use images::LoadedImage;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) browser: ContentBrowser,
    pub(crate) client: ContentClient,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Request plumbing
    pub(crate) reply_tx: mpsc::UnboundedSender<ServiceReply>,
    pub(crate) reply_rx: mpsc::UnboundedReceiver<ServiceReply>,
    pub(crate) list_cancel: Option<CancellationToken>,
    // Photos
    pub(crate) image_tx: mpsc::UnboundedSender<LoadedImage>,
    pub(crate) image_rx: mpsc::UnboundedReceiver<LoadedImage>,
    pub(crate) image_cache: HashMap<String, ImageSlot>,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Sidebar input
    pub(crate) title_input: String,
    pub(crate) focus_title: bool,
    pub(crate) show_empty_prompt: bool,
    // Settings
    pub(crate) show_settings: bool,
    pub(crate) service_url: String,
    pub(crate) service_url_input: String,
    pub(crate) service_url_error: Option<String>,
    pub(crate) show_thumbnails: bool,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Result<Self, InitError> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("content-io")
            .build()?;

        let session_url = settings.effective_service_url();
        let client = match ContentClient::new(&session_url) {
            Ok(client) => client,
            Err(e) => {
                warn!(url = %session_url, error = %e, "Invalid service url, using default");
                ContentClient::new(DEFAULT_SERVICE_URL)?
            }
        };
        info!(url = %client.base_url(), "Content service configured");

        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let (image_tx, image_rx) = mpsc::unbounded_channel();

        Ok(Self {
            browser: ContentBrowser::new(),
            service_url_input: client.base_url().to_string(),
            client,
            runtime,
            reply_tx,
            reply_rx,
            list_cancel: None,
            image_tx,
            image_rx,
            image_cache: HashMap::new(),
            logo_texture: None,
            title_input: settings.last_title,
            focus_title: true,
            show_empty_prompt: false,
            show_settings: false,
            service_url: settings.service_url,
            service_url_error: None,
            show_thumbnails: settings.show_thumbnails,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        })
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            service_url: self.service_url.clone(),
            show_thumbnails: self.show_thumbnails,
            last_title: self
                .browser
                .last_title()
                .map(str::to_string)
                .unwrap_or_else(|| self.title_input.clone()),
        };
        settings.save(&self.data_dir);
    }

    /// Switch to the service root typed into the settings panel.
    ///
    /// Requests already in flight finish against the old root.
    pub fn apply_service_url(&mut self) {
        let url = self.service_url_input.trim().to_string();
        match ContentClient::new(&url) {
            Ok(client) => {
                info!(url = %client.base_url(), "Service url changed");
                self.service_url = client.base_url().to_string();
                self.service_url_input = self.service_url.clone();
                self.service_url_error = None;
                self.client = client;
                self.clear_images();
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Rejected service url");
                self.service_url_error = Some(e.to_string());
            }
        }
    }
}
