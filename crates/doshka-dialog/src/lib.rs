// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue state machine for the Doshka classifieds bot.
//!
//! The [`DialogController`] is the central coordinator: for each inbound
//! user action it looks up the transition for (current step, action),
//! validates input, updates session state, performs store reads/writes,
//! computes pagination, and drives the interface renderer.
//!
//! Dialogue-level rejections ([`reject::Rejection`]) are always recovered
//! in place; only store failures reach [`DialogController::handle_event`]'s
//! top level, which logs, shows a generic failure screen, and resets the
//! conversation to the main menu so it is never left unresponsive.

pub mod action;
pub mod pagination;
pub mod reject;
pub mod renderer;
pub mod screens;
pub mod session;
pub mod validate;

use std::sync::Arc;

use chrono::Utc;
use doshka_config::model::{BoardConfig, DoshkaConfig};
use doshka_core::types::{
    ChatId, EventPayload, InboundEvent, Listing, ListingFilter, UserId,
};
use doshka_core::{ChannelGateway, DoshkaError, ListingStore};
use tracing::{debug, error, info, warn};

use crate::action::Action;
use crate::pagination::PageView;
use crate::reject::Rejection;
use crate::renderer::InterfaceRenderer;
use crate::screens::Screen;
use crate::session::{Session, SessionMap, Step};

/// Counter name for listing id allocation.
const POST_ID_SEQUENCE: &str = "postid";

const FAILURE_NOTICE: &str = "⚠️ Something went wrong on our side. Please try again.";

/// The finite-state dialogue controller.
///
/// Owns the per-conversation sessions and holds its collaborators by
/// injection; there are no process-wide handles. Events are handled
/// sequentially, which gives per-conversation ordering for free.
pub struct DialogController {
    store: Arc<dyn ListingStore + Send + Sync>,
    renderer: InterfaceRenderer,
    board: BoardConfig,
    bot_name: String,
    sessions: SessionMap,
}

impl DialogController {
    pub fn new(
        store: Arc<dyn ListingStore + Send + Sync>,
        gateway: Arc<dyn ChannelGateway + Send + Sync>,
        config: &DoshkaConfig,
    ) -> Self {
        Self {
            store,
            renderer: InterfaceRenderer::new(gateway),
            board: config.board.clone(),
            bot_name: config.bot.name.clone(),
            sessions: SessionMap::new(),
        }
    }

    /// Read-only session access, for assertions in tests.
    pub fn session(&self, chat: ChatId) -> Option<&Session> {
        self.sessions.get(chat)
    }

    /// Handles one inbound event to completion.
    ///
    /// Never panics and never propagates: a store failure is logged and
    /// answered with a generic failure screen plus a reset to the menu.
    pub async fn handle_event(&mut self, event: InboundEvent) {
        let chat = event.chat;
        if let Err(e) = self.dispatch(&event).await {
            error!(chat_id = chat.0, error = %e, "store failure while handling event");
            let session = self.sessions.entry(chat);
            session.step = Some(Step::MainMenu);
            session.draft.clear();
            session.edit_target = None;
            let screen = screens::main_menu(&self.bot_name, Some(FAILURE_NOTICE));
            self.present(chat, &screen).await;
        }
    }

    async fn dispatch(&mut self, event: &InboundEvent) -> Result<(), DoshkaError> {
        match &event.payload {
            EventPayload::Text(text) => self.handle_text(event, text).await,
            EventPayload::Control(data) => {
                let step = self.sessions.entry(event.chat).step;
                let Some(step) = step else {
                    // State was lost (e.g. restart) while an old screen's
                    // controls were still visible.
                    return self.recover_stale(event).await;
                };
                match Action::parse(data) {
                    Some(Action::Noop) => Ok(()),
                    Some(action) => self.handle_action(event, step, action).await,
                    None => {
                        warn!(
                            chat_id = event.chat.0,
                            data = data.as_str(),
                            "unrecognized control action"
                        );
                        Ok(())
                    }
                }
            }
        }
    }

    async fn handle_action(
        &mut self,
        event: &InboundEvent,
        step: Step,
        action: Action,
    ) -> Result<(), DoshkaError> {
        let chat = event.chat;
        debug!(chat_id = chat.0, step = %step, action = ?action, "handling action");

        match (step, action) {
            // Global navigation.
            (_, Action::MainMenu) => self.show_step(event, Step::MainMenu, None).await,
            (_, Action::Back) => self.show_step(event, step.back_target(), None).await,

            // Main menu entry points.
            (Step::MainMenu, Action::NewListing) => {
                self.sessions.entry(chat).draft.clear();
                self.show_step(event, Step::AddKind, None).await
            }
            (Step::MainMenu, Action::Browse) => {
                self.sessions.entry(chat).view = Default::default();
                self.show_step(event, Step::ViewCategory, None).await
            }
            (Step::MainMenu, Action::MyListings) => {
                self.sessions.entry(chat).my_offset = 0;
                self.show_step(event, Step::MyListings, None).await
            }
            (Step::MainMenu, Action::Help) => {
                // Help is a screen, not a step; Back from it is MainMenu's
                // own back edge.
                let screen = screens::help(&self.board);
                self.present(chat, &screen).await;
                Ok(())
            }

            // Creation flow.
            (Step::AddKind, Action::Kind(kind)) => {
                self.sessions.entry(chat).draft.kind = Some(kind);
                self.show_step(event, Step::AddCategory, None).await
            }
            (Step::AddCategory, Action::Category(index)) => match self.board.category(index) {
                Some(label) => {
                    let label = label.to_string();
                    self.sessions.entry(chat).draft.category = Some(label);
                    self.show_step(event, Step::AddDescription, None).await
                }
                None => {
                    // Out-of-range index is a data error (stale or forged
                    // control), not user error.
                    warn!(chat_id = chat.0, index, "category index out of range");
                    self.show_step(event, Step::AddCategory, None).await
                }
            },
            (Step::AddContact, Action::SkipContact) => {
                self.sessions.entry(chat).draft.contact = None;
                self.show_step(event, Step::AddConfirm, None).await
            }
            (Step::AddConfirm, Action::Confirm) => self.publish_draft(event).await,
            (Step::AddConfirm, Action::Cancel) => {
                self.sessions.entry(chat).draft.clear();
                self.show_step(event, Step::MainMenu, Some("❌ Creation cancelled."))
                    .await
            }

            // Browse flow.
            (Step::ViewCategory, Action::BrowseKind(kind)) => {
                self.sessions.entry(chat).view.kind = kind;
                self.show_step(event, Step::ViewCategory, None).await
            }
            (Step::ViewCategory, Action::Category(index)) => match self.board.category(index) {
                Some(label) => {
                    let label = label.to_string();
                    let session = self.sessions.entry(chat);
                    session.view.category = Some(label);
                    session.view.offset = 0;
                    self.show_step(event, Step::ViewListing, None).await
                }
                None => {
                    warn!(chat_id = chat.0, index, "category index out of range");
                    self.show_step(event, Step::ViewCategory, None).await
                }
            },
            (Step::ViewListing, Action::Page(offset)) => {
                self.sessions.entry(chat).view.offset = offset;
                self.show_step(event, Step::ViewListing, None).await
            }

            // Own listings.
            (Step::MyListings, Action::Page(offset)) => {
                self.sessions.entry(chat).my_offset = offset;
                self.show_step(event, Step::MyListings, None).await
            }
            (Step::MyListings, Action::Edit(id)) => self.begin_edit(event, id).await,
            (Step::MyListings, Action::Delete(id)) => self.delete_listing(event, id).await,

            _ => {
                debug!(chat_id = chat.0, step = %step, "action not valid in current step");
                Ok(())
            }
        }
    }

    async fn handle_text(&mut self, event: &InboundEvent, text: &str) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let step = self.sessions.entry(chat).step;
        match step {
            None => {
                // First contact (typically /start): show the welcome menu.
                info!(chat_id = chat.0, "new conversation");
                self.show_step(event, Step::MainMenu, None).await
            }
            Some(Step::AddDescription) => match validate::description(text) {
                Ok(description) => {
                    self.sessions.entry(chat).draft.description = Some(description);
                    self.show_step(event, Step::AddContact, None).await
                }
                Err(rejection) => {
                    let notice = rejection.notice();
                    self.show_step(event, Step::AddDescription, Some(&notice)).await
                }
            },
            Some(Step::AddContact) => match validate::contact(text) {
                Ok(contact) => {
                    self.sessions.entry(chat).draft.contact = contact;
                    self.show_step(event, Step::AddConfirm, None).await
                }
                Err(rejection) => {
                    let notice = rejection.notice();
                    self.show_step(event, Step::AddContact, Some(&notice)).await
                }
            },
            Some(Step::EditDescription) => self.apply_edit(event, text).await,
            Some(step) => {
                debug!(chat_id = chat.0, step = %step, "ignoring text outside input steps");
                Ok(())
            }
        }
    }

    /// Renders `step`'s screen and records it as the current step.
    async fn show_step(
        &mut self,
        event: &InboundEvent,
        step: Step,
        notice: Option<&str>,
    ) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let screen = match step {
            Step::MainMenu => screens::main_menu(&self.bot_name, notice),
            Step::AddKind => screens::kind_select(&self.board, notice),
            Step::AddCategory => screens::add_category_select(&self.board, notice),
            Step::AddDescription => screens::description_prompt(notice),
            Step::AddContact => screens::contact_prompt(notice),
            Step::AddConfirm => {
                let draft = self.sessions.entry(chat).draft.clone();
                screens::confirm_summary(&self.board, &draft, notice)
            }
            Step::ViewCategory => {
                let kind = self.sessions.entry(chat).view.kind;
                screens::browse_filter(&self.board, kind)
            }
            Step::ViewListing => return self.show_browse_page(event).await,
            Step::MyListings => return self.show_my_page(event, notice).await,
            Step::EditDescription => match self.sessions.entry(chat).edit_target {
                Some(id) => screens::edit_description_prompt(id, notice),
                None => {
                    debug!(chat_id = chat.0, "no edit target, returning to my listings");
                    return self.show_my_page(event, notice).await;
                }
            },
        };
        self.sessions.entry(chat).step = Some(step);
        self.present(chat, &screen).await;
        Ok(())
    }

    /// Queries and renders the browsed category's current page.
    async fn show_browse_page(&mut self, event: &InboundEvent) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let view = self.sessions.entry(chat).view.clone();
        let Some(category) = view.category else {
            // The filter vanished (lost session data); the menu is the only
            // screen that still makes sense.
            debug!(chat_id = chat.0, "browse without a category, returning to menu");
            self.sessions.entry(chat).step = Some(Step::MainMenu);
            let screen = screens::main_menu(&self.bot_name, None);
            self.present(chat, &screen).await;
            return Ok(());
        };

        let page_size = self.board.view_page_size;
        let filter = ListingFilter::browse(category.clone(), view.kind);
        let mut offset = view.offset;
        let (mut items, mut total) = self.store.find_page(&filter, offset, page_size).await?;

        // The collection may have shrunk under the cursor (expiry or
        // deletion); clamp to the last page and re-read.
        let max_offset = PageView::max_offset(total, page_size);
        if offset > max_offset {
            offset = max_offset;
            (items, total) = self.store.find_page(&filter, offset, page_size).await?;
        }
        self.sessions.entry(chat).view.offset = offset;

        let screen = if total == 0 {
            screens::browse_empty(&category)
        } else {
            let page = PageView::new(total, offset, page_size);
            screens::browse_page(&self.board, &category, &items, &page)
        };
        self.sessions.entry(chat).step = Some(Step::ViewListing);
        self.present(chat, &screen).await;
        Ok(())
    }

    /// Queries and renders the caller's own listings page.
    async fn show_my_page(
        &mut self,
        event: &InboundEvent,
        notice: Option<&str>,
    ) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let page_size = self.board.my_page_size;
        let filter = ListingFilter::owned_by(event.user);
        let mut offset = self.sessions.entry(chat).my_offset;
        let (mut items, mut total) = self.store.find_page(&filter, offset, page_size).await?;

        let max_offset = PageView::max_offset(total, page_size);
        if offset > max_offset {
            offset = max_offset;
            (items, total) = self.store.find_page(&filter, offset, page_size).await?;
        }

        let screen = if total == 0 {
            screens::my_empty(notice)
        } else {
            let page = PageView::new(total, offset, page_size);
            screens::my_page(&self.board, &items, &page, Utc::now(), notice)
        };
        let session = self.sessions.entry(chat);
        session.my_offset = offset;
        session.step = Some(Step::MyListings);
        session.edit_target = None;
        self.present(chat, &screen).await;
        Ok(())
    }

    /// Validates the draft once more and persists it.
    async fn publish_draft(&mut self, event: &InboundEvent) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let draft = self.sessions.entry(chat).draft.clone();
        let (Some(kind), Some(category), Some(description)) =
            (draft.kind, draft.category, draft.description)
        else {
            warn!(chat_id = chat.0, "confirm with an incomplete draft");
            self.sessions.entry(chat).draft.clear();
            return self
                .show_step(event, Step::AddKind, Some("⚠️ The draft went missing; let's start over."))
                .await;
        };

        // The contact was validated on entry; re-check against stale state
        // before anything is persisted.
        if let Some(contact) = &draft.contact
            && let Err(rejection) = validate::contact(contact)
        {
            let notice = rejection.notice();
            return self.show_step(event, Step::AddContact, Some(&notice)).await;
        }

        let id = self.store.next_id(POST_ID_SEQUENCE).await?;
        let listing = Listing {
            id,
            owner_id: event.user,
            owner_display: event.user_display.clone(),
            kind,
            category,
            description,
            contact: draft.contact,
            created_at: Utc::now(),
        };
        self.store.insert(&listing).await?;
        info!(chat_id = chat.0, listing_id = id, kind = %kind, "listing published");

        let session = self.sessions.entry(chat);
        session.draft.clear();
        session.my_offset = 0;
        let notice = format!("✅ Listing #{id} is published.");
        self.show_step(event, Step::MyListings, Some(&notice)).await
    }

    /// Opens the description editor when ownership and window checks pass;
    /// otherwise rejects in place without a state change.
    async fn begin_edit(&mut self, event: &InboundEvent, id: i64) -> Result<(), DoshkaError> {
        match self.check_editable(id, event.user).await? {
            Ok(_) => {
                self.sessions.entry(event.chat).edit_target = Some(id);
                self.show_step(event, Step::EditDescription, None).await
            }
            Err(rejection) => {
                let notice = rejection.notice();
                self.show_my_page(event, Some(&notice)).await
            }
        }
    }

    /// Owner-scoped lookup plus the freshly evaluated edit-window gate.
    async fn check_editable(
        &self,
        id: i64,
        user: UserId,
    ) -> Result<Result<Listing, Rejection>, DoshkaError> {
        match self.store.find_one(id, user).await? {
            None => Ok(Err(Rejection::NotFound)),
            Some(listing) if !listing.editable_at(Utc::now(), self.board.edit_window()) => {
                Ok(Err(Rejection::Unauthorized))
            }
            Some(listing) => Ok(Ok(listing)),
        }
    }

    /// Applies the replacement description typed in the editing step.
    async fn apply_edit(&mut self, event: &InboundEvent, text: &str) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let description = match validate::description(text) {
            Ok(d) => d,
            Err(rejection) => {
                let notice = rejection.notice();
                return self
                    .show_step(event, Step::EditDescription, Some(&notice))
                    .await;
            }
        };

        let Some(id) = self.sessions.entry(chat).edit_target else {
            debug!(chat_id = chat.0, "edit text with no target listing");
            return self.show_my_page(event, None).await;
        };

        // The window gate is evaluated again at apply time; the screen may
        // have been open for longer than the window.
        let notice = match self.check_editable(id, event.user).await? {
            Err(rejection) => rejection.notice(),
            Ok(_) => {
                let matched = self
                    .store
                    .update_description(id, event.user, &description)
                    .await?;
                if matched {
                    info!(chat_id = chat.0, listing_id = id, "description updated");
                    format!("✅ Listing #{id} is updated.")
                } else {
                    Rejection::NotFound.notice()
                }
            }
        };
        self.show_my_page(event, Some(&notice)).await
    }

    /// Immediate owner-gated deletion with last-page offset stepping.
    async fn delete_listing(&mut self, event: &InboundEvent, id: i64) -> Result<(), DoshkaError> {
        let chat = event.chat;
        let deleted = self.store.delete(id, event.user).await?;
        let notice = if deleted {
            info!(chat_id = chat.0, listing_id = id, "listing deleted");
            format!("🗑️ Listing #{id} is deleted.")
        } else {
            Rejection::NotFound.notice()
        };
        // show_my_page clamps the offset back when the last page emptied.
        self.show_my_page(event, Some(&notice)).await
    }

    /// Discards the stale screen a control came from and restarts from the
    /// menu with an explanation.
    async fn recover_stale(&mut self, event: &InboundEvent) -> Result<(), DoshkaError> {
        let chat = event.chat;
        info!(chat_id = chat.0, "control with no recorded step, recovering");
        if let Some(origin) = event.origin_message {
            let session = self.sessions.entry(chat);
            self.renderer.discard(chat, session, origin).await;
        }
        let notice = Rejection::StaleSession.notice();
        self.show_step(event, Step::MainMenu, Some(&notice)).await
    }

    async fn present(&mut self, chat: ChatId, screen: &Screen) {
        let session = self.sessions.entry(chat);
        self.renderer.present(chat, session, screen).await;
    }
}
