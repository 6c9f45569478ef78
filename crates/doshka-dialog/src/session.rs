// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation dialogue state.
//!
//! A [`Session`] lives for the process lifetime and is never persisted;
//! after a restart the controller's stale-session recovery path rebuilds
//! it from the main menu. Per-conversation serialization comes from the
//! single sequential event loop, so the map needs no internal locking.

use std::collections::HashMap;

use doshka_core::types::{ChatId, ListingKind, MessageId};

/// States of the dialogue machine. There is no terminal state; every
/// screen offers a path back to [`Step::MainMenu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    MainMenu,
    AddKind,
    AddCategory,
    AddDescription,
    AddContact,
    AddConfirm,
    ViewCategory,
    ViewListing,
    MyListings,
    EditDescription,
}

impl Step {
    /// The logically preceding step, used by the generic "back" action.
    ///
    /// A reverse-edge table keyed by current state, not a history stack:
    /// going back twice from the same state always lands in the same place.
    pub fn back_target(self) -> Step {
        match self {
            Step::MainMenu => Step::MainMenu,
            Step::AddKind => Step::MainMenu,
            Step::AddCategory => Step::AddKind,
            Step::AddDescription => Step::AddCategory,
            Step::AddContact => Step::AddDescription,
            Step::AddConfirm => Step::AddContact,
            Step::ViewCategory => Step::MainMenu,
            Step::ViewListing => Step::ViewCategory,
            Step::MyListings => Step::MainMenu,
            Step::EditDescription => Step::MyListings,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::MainMenu => "main_menu",
            Step::AddKind => "add_kind",
            Step::AddCategory => "add_category",
            Step::AddDescription => "add_description",
            Step::AddContact => "add_contact",
            Step::AddConfirm => "add_confirm",
            Step::ViewCategory => "view_category",
            Step::ViewListing => "view_listing",
            Step::MyListings => "my_listings",
            Step::EditDescription => "edit_description",
        };
        write!(f, "{name}")
    }
}

/// Accumulated fields for an in-progress creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub kind: Option<ListingKind>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub contact: Option<String>,
}

impl Draft {
    pub fn clear(&mut self) {
        *self = Draft::default();
    }
}

/// Current browse filter and pagination cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewContext {
    pub category: Option<String>,
    pub kind: Option<ListingKind>,
    pub offset: u64,
}

/// Ephemeral state of one conversation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Current dialogue step; `None` until the first screen is presented.
    pub step: Option<Step>,
    pub draft: Draft,
    pub view: ViewContext,
    /// Pagination cursor for the owner-scoped screen.
    pub my_offset: u64,
    /// The one message currently presenting the interface.
    /// Mutated only by the renderer.
    pub live_message: Option<MessageId>,
    /// Listing id being re-described while in the description-editing step.
    pub edit_target: Option<i64>,
}

/// All sessions, keyed by conversation.
#[derive(Debug, Default)]
pub struct SessionMap {
    sessions: HashMap<ChatId, Session>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `chat`, created fresh on first interaction.
    pub fn entry(&mut self, chat: ChatId) -> &mut Session {
        self.sessions.entry(chat).or_default()
    }

    pub fn get(&self, chat: ChatId) -> Option<&Session> {
        self.sessions.get(&chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_edges_terminate_at_main_menu() {
        // Following back edges from any step reaches MainMenu within the
        // depth of the longest flow.
        let all = [
            Step::MainMenu,
            Step::AddKind,
            Step::AddCategory,
            Step::AddDescription,
            Step::AddContact,
            Step::AddConfirm,
            Step::ViewCategory,
            Step::ViewListing,
            Step::MyListings,
            Step::EditDescription,
        ];
        for start in all {
            let mut step = start;
            for _ in 0..10 {
                step = step.back_target();
            }
            assert_eq!(step, Step::MainMenu, "from {start}");
        }
    }

    #[test]
    fn back_is_deterministic_not_a_stack() {
        assert_eq!(Step::ViewListing.back_target(), Step::ViewCategory);
        assert_eq!(Step::ViewListing.back_target(), Step::ViewCategory);
        assert_eq!(Step::EditDescription.back_target(), Step::MyListings);
        assert_eq!(Step::MainMenu.back_target(), Step::MainMenu);
    }

    #[test]
    fn entry_creates_default_session_once() {
        let mut map = SessionMap::new();
        let chat = ChatId(5);
        assert!(map.get(chat).is_none());

        map.entry(chat).step = Some(Step::MainMenu);
        assert_eq!(map.get(chat).unwrap().step, Some(Step::MainMenu));

        // Second entry returns the same session.
        assert_eq!(map.entry(chat).step, Some(Step::MainMenu));
    }

    #[test]
    fn draft_clear_resets_all_fields() {
        let mut draft = Draft {
            kind: Some(ListingKind::Job),
            category: Some("Other".into()),
            description: Some("text".into()),
            contact: Some("@someone".into()),
        };
        draft.clear();
        assert_eq!(draft, Draft::default());
    }
}
