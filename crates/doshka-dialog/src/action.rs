// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed user actions and their stable wire encoding.
//!
//! Control presses arrive from the transport as opaque strings. They are
//! decoded here exactly once, at the boundary, into a tagged enum; the
//! controller then matches on (step, action) pairs. The string scheme is
//! stable because controls rendered before a restart must still decode.

use doshka_core::types::ListingKind;

/// A decoded user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start creating a listing.
    NewListing,
    /// Start browsing listings by category.
    Browse,
    /// Show the caller's own listings.
    MyListings,
    /// Show the help screen.
    Help,
    /// Choose the kind of the listing being created.
    Kind(ListingKind),
    /// Narrow (or widen) the browse filter by kind.
    BrowseKind(Option<ListingKind>),
    /// Choose a category by index into the configured enumeration.
    Category(usize),
    /// Jump to an absolute pagination offset.
    Page(u64),
    /// Edit the description of an owned listing.
    Edit(i64),
    /// Delete an owned listing.
    Delete(i64),
    /// Confirm the pending creation.
    Confirm,
    /// Abandon the pending creation.
    Cancel,
    /// Skip the optional contact entry.
    SkipContact,
    /// Return to the main menu from anywhere.
    MainMenu,
    /// Return to the preceding step.
    Back,
    /// Inert filler control (pagination alignment).
    Noop,
}

impl Action {
    /// Encodes the action as a stable control-data string.
    pub fn encode(&self) -> String {
        match self {
            Action::NewListing => "add".into(),
            Action::Browse => "browse".into(),
            Action::MyListings => "mine".into(),
            Action::Help => "help".into(),
            Action::Kind(kind) => format!("kind:{kind}"),
            Action::BrowseKind(None) => "bkind:all".into(),
            Action::BrowseKind(Some(kind)) => format!("bkind:{kind}"),
            Action::Category(index) => format!("cat:{index}"),
            Action::Page(offset) => format!("page:{offset}"),
            Action::Edit(id) => format!("edit:{id}"),
            Action::Delete(id) => format!("del:{id}"),
            Action::Confirm => "confirm".into(),
            Action::Cancel => "cancel".into(),
            Action::SkipContact => "skip".into(),
            Action::MainMenu => "menu".into(),
            Action::Back => "back".into(),
            Action::Noop => "noop".into(),
        }
    }

    /// Decodes a control-data string; `None` for anything unrecognized.
    pub fn parse(data: &str) -> Option<Action> {
        if let Some((prefix, rest)) = data.split_once(':') {
            return match prefix {
                "kind" => rest.parse().ok().map(Action::Kind),
                "bkind" if rest == "all" => Some(Action::BrowseKind(None)),
                "bkind" => rest.parse().ok().map(|k| Action::BrowseKind(Some(k))),
                "cat" => rest.parse().ok().map(Action::Category),
                "page" => rest.parse().ok().map(Action::Page),
                "edit" => rest.parse().ok().map(Action::Edit),
                "del" => rest.parse().ok().map(Action::Delete),
                _ => None,
            };
        }
        match data {
            "add" => Some(Action::NewListing),
            "browse" => Some(Action::Browse),
            "mine" => Some(Action::MyListings),
            "help" => Some(Action::Help),
            "confirm" => Some(Action::Confirm),
            "cancel" => Some(Action::Cancel),
            "skip" => Some(Action::SkipContact),
            "menu" => Some(Action::MainMenu),
            "back" => Some(Action::Back),
            "noop" => Some(Action::Noop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_round_trips() {
        let actions = [
            Action::NewListing,
            Action::Browse,
            Action::MyListings,
            Action::Help,
            Action::Kind(ListingKind::Job),
            Action::Kind(ListingKind::Service),
            Action::BrowseKind(None),
            Action::BrowseKind(Some(ListingKind::Service)),
            Action::Category(0),
            Action::Category(6),
            Action::Page(0),
            Action::Page(10),
            Action::Edit(42),
            Action::Delete(42),
            Action::Confirm,
            Action::Cancel,
            Action::SkipContact,
            Action::MainMenu,
            Action::Back,
            Action::Noop,
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn unknown_strings_do_not_parse() {
        for data in ["", "bogus", "cat:", "cat:x", "page:-1", "kind:bike", "edit:", "cat:1:2"] {
            assert_eq!(Action::parse(data), None, "parsed {data:?}");
        }
    }

    #[test]
    fn stable_wire_names() {
        assert_eq!(Action::Kind(ListingKind::Job).encode(), "kind:job");
        assert_eq!(Action::BrowseKind(None).encode(), "bkind:all");
        assert_eq!(Action::Page(10).encode(), "page:10");
        assert_eq!(Action::Delete(7).encode(), "del:7");
    }
}
