//! Service requests: list by title and detail refresh

use super::App;
use crate::browser::{Applied, FetchTicket, RefreshTicket};
use crate::client::ContentClient;
use crate::error::{FetchError, InputError};
use crate::types::Content;
use eframe::egui;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Result of a request, sent back to the UI thread.
pub enum ServiceReply {
    List {
        seq: u64,
        result: Result<Vec<Content>, FetchError>,
    },
    Refresh {
        ticket: RefreshTicket,
        result: Result<Content, FetchError>,
    },
}

/// Run one list request. A cancelled request sends nothing.
pub fn spawn_list_fetch(
    handle: &tokio::runtime::Handle,
    client: ContentClient,
    ticket: FetchTicket,
    token: CancellationToken,
    tx: UnboundedSender<ServiceReply>,
    ctx: egui::Context,
) {
    handle.spawn(async move {
        let result = tokio::select! {
            _ = token.cancelled() => Err(FetchError::Cancelled),
            result = client.list_by_title(&ticket.title) => result,
        };
        if result.as_ref().is_err_and(FetchError::is_cancelled) {
            debug!(seq = ticket.seq, title = %ticket.title, "List request cancelled");
            return;
        }
        tx.send(ServiceReply::List {
            seq: ticket.seq,
            result,
        })
        .ok();
        ctx.request_repaint();
    });
}

pub fn spawn_refresh(
    handle: &tokio::runtime::Handle,
    client: ContentClient,
    ticket: RefreshTicket,
    tx: UnboundedSender<ServiceReply>,
    ctx: egui::Context,
) {
    handle.spawn(async move {
        let result = client.get_by_id(&ticket.id).await;
        tx.send(ServiceReply::Refresh { ticket, result }).ok();
        ctx.request_repaint();
    });
}

impl App {
    /// Fetch-button / Enter handler.
    pub fn submit_title(&mut self, ctx: &egui::Context) {
        let ticket = match self.browser.request_list(&self.title_input) {
            Ok(ticket) => ticket,
            Err(InputError::EmptyTitle) => {
                debug!("Empty title submitted");
                self.show_empty_prompt = true;
                return;
            }
        };

        if let Some(previous) = self.list_cancel.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.list_cancel = Some(token.clone());

        info!(seq = ticket.seq, title = %ticket.title, "Fetching contents");
        spawn_list_fetch(
            self.runtime.handle(),
            self.client.clone(),
            ticket,
            token,
            self.reply_tx.clone(),
            ctx.clone(),
        );
    }

    pub fn refresh_detail(&mut self, ctx: &egui::Context) {
        let Some(ticket) = self.browser.request_refresh() else {
            return;
        };
        info!(id = %ticket.id, "Refreshing content");
        spawn_refresh(
            self.runtime.handle(),
            self.client.clone(),
            ticket,
            self.reply_tx.clone(),
            ctx.clone(),
        );
    }

    /// Apply replies that arrived since the last frame.
    pub fn poll_service_replies(&mut self) {
        while let Ok(reply) = self.reply_rx.try_recv() {
            match reply {
                ServiceReply::List { seq, result } => {
                    if let Applied::Listed(_) | Applied::Failed = self.browser.apply_list(seq, result) {
                        self.list_cancel = None;
                        self.prune_images();
                    }
                }
                ServiceReply::Refresh { ticket, result } => {
                    self.browser.apply_refresh(&ticket, result);
                }
            }
        }
    }
}
