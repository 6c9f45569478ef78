// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screen construction: text plus controls for every dialogue step.
//!
//! Screens are plain values; presentation markup escaping is the
//! transport's concern. Every screen offers a path back to the main menu.

use chrono::{DateTime, Utc};
use doshka_config::model::BoardConfig;
use doshka_core::types::{Control, Controls, Listing, ListingKind};

use crate::action::Action;
use crate::pagination::PageView;
use crate::session::Draft;

/// One logical screen: what to show and which controls to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub controls: Controls,
}

const DIVIDER: &str = "──────────";

fn notice_block(notice: Option<&str>) -> String {
    notice.map(|n| format!("{n}\n\n")).unwrap_or_default()
}

fn back_row() -> Vec<Control> {
    vec![Control::action("⬅️ Back", Action::Back.encode())]
}

fn menu_row() -> Vec<Control> {
    vec![Control::action("🏠 Main menu", Action::MainMenu.encode())]
}

fn kind_label(kind: ListingKind) -> &'static str {
    match kind {
        ListingKind::Job => "Job",
        ListingKind::Service => "Service",
    }
}

/// The welcome / main menu screen.
pub fn main_menu(bot_name: &str, notice: Option<&str>) -> Screen {
    let text = format!(
        "{}👋 Hi! I am {bot_name}, the neighborhood classifieds board.\n\n\
         ➕ post a job or a service\n\
         🔍 browse listings by category\n\
         🗂️ manage your own listings",
        notice_block(notice)
    );
    let controls = Controls::new()
        .row(vec![
            Control::action("➕ New listing", Action::NewListing.encode()),
            Control::action("🔍 Browse", Action::Browse.encode()),
        ])
        .row(vec![
            Control::action("🗂️ My listings", Action::MyListings.encode()),
            Control::action("❓ Help", Action::Help.encode()),
        ]);
    Screen { text, controls }
}

/// Usage summary.
pub fn help(board: &BoardConfig) -> Screen {
    let text = format!(
        "❓ How this board works\n\n\
         ➕ New listing walks you through kind, category, description and an \
         optional contact, then publishes after your confirmation.\n\
         🔍 Browse shows listings in a category, newest first, five per page.\n\
         🗂️ My listings lets you edit a description within {} minutes of \
         posting, or delete a listing at any time.\n\n\
         Listings disappear automatically after {} days.",
        board.edit_window_minutes, board.retention_days
    );
    Screen {
        text,
        controls: Controls::new().row(menu_row()),
    }
}

/// Kind selection for a new listing.
pub fn kind_select(board: &BoardConfig, notice: Option<&str>) -> Screen {
    let text = format!("{}What are you posting?", notice_block(notice));
    let controls = Controls::new()
        .row(vec![
            Control::action(
                format!("{} Job", board.job_glyph),
                Action::Kind(ListingKind::Job).encode(),
            ),
            Control::action(
                format!("{} Service", board.service_glyph),
                Action::Kind(ListingKind::Service).encode(),
            ),
        ])
        .row(back_row());
    Screen { text, controls }
}

fn category_rows(board: &BoardConfig) -> Vec<Vec<Control>> {
    board
        .categories
        .iter()
        .enumerate()
        .map(|(i, label)| vec![Control::action(label, Action::Category(i).encode())])
        .collect()
}

/// Category selection while creating a listing.
pub fn add_category_select(board: &BoardConfig, notice: Option<&str>) -> Screen {
    let text = format!("{}Pick a category for your listing:", notice_block(notice));
    let mut controls = Controls::new();
    controls.rows.extend(category_rows(board));
    controls.rows.push(back_row());
    Screen { text, controls }
}

/// Category selection while browsing, with a kind pre-filter row.
pub fn browse_filter(board: &BoardConfig, active: Option<ListingKind>) -> Screen {
    let text = "🔍 What are you looking for?\n\n\
                Narrow by type if you like, then pick a category:"
        .to_string();

    let filter_button = |label: &str, value: Option<ListingKind>| {
        let marked = if value == active {
            format!("• {label}")
        } else {
            label.to_string()
        };
        Control::action(marked, Action::BrowseKind(value).encode())
    };

    let mut controls = Controls::new().row(vec![
        filter_button("All", None),
        filter_button(&format!("{} Jobs", board.job_glyph), Some(ListingKind::Job)),
        filter_button(
            &format!("{} Services", board.service_glyph),
            Some(ListingKind::Service),
        ),
    ]);
    controls.rows.extend(category_rows(board));
    controls.rows.push(back_row());
    Screen { text, controls }
}

/// Free-text prompt for the listing description.
pub fn description_prompt(notice: Option<&str>) -> Screen {
    let text = format!(
        "{}✍️ Describe your listing in one message (up to {} characters).",
        notice_block(notice),
        crate::validate::MAX_DESCRIPTION_CHARS
    );
    Screen {
        text,
        controls: Controls::new().row(back_row()),
    }
}

/// Free-text prompt for the optional contact.
pub fn contact_prompt(notice: Option<&str>) -> Screen {
    let text = format!(
        "{}📞 Send a contact for the listing: a phone number (0XXXXXXXXX or \
         +380XXXXXXXXX) or an @handle.\n\nOr skip this step.",
        notice_block(notice)
    );
    let controls = Controls::new()
        .row(vec![Control::action("❎ Skip", Action::SkipContact.encode())])
        .row(back_row());
    Screen { text, controls }
}

/// Review-and-publish screen at the end of the creation flow.
pub fn confirm_summary(board: &BoardConfig, draft: &Draft, notice: Option<&str>) -> Screen {
    let kind_line = draft
        .kind
        .map(|k| format!("{} {}", board.glyph(k), kind_label(k)))
        .unwrap_or_default();
    let category = draft.category.as_deref().unwrap_or_default();
    let description = draft.description.as_deref().unwrap_or_default();
    let mut block = format!("{kind_line} · {category}\n🔹 {description}");
    if let Some(contact) = &draft.contact {
        block.push_str(&format!("\n📞 Contact: {contact}"));
    }

    let text = format!(
        "{}Almost done! Review your listing:\n\n{block}\n\nPublish it?",
        notice_block(notice)
    );
    let controls = Controls::new()
        .row(vec![
            Control::action("✅ Publish", Action::Confirm.encode()),
            Control::action("❌ Cancel", Action::Cancel.encode()),
        ])
        .row(back_row());
    Screen { text, controls }
}

/// One rendered listing block. `position` numbers items on owner pages.
fn listing_block(board: &BoardConfig, listing: &Listing, position: Option<u64>) -> String {
    let mut block = match position {
        Some(n) => format!("{n}. ID {}\n", listing.id),
        None => format!("ID: {}\n", listing.id),
    };
    block.push_str(&format!(
        "{} {} · {}\n",
        board.glyph(listing.kind),
        kind_label(listing.kind),
        listing.category
    ));
    block.push_str(&format!("🔹 {}\n", listing.description));
    match &listing.owner_display {
        Some(username) => block.push_str(&format!("👤 @{username}\n")),
        None => block.push_str("👤 Private user\n"),
    }
    if let Some(contact) = &listing.contact {
        block.push_str(&format!("📞 Contact: {contact}\n"));
    }
    block
}

fn pagination_row(page: &PageView) -> Vec<Control> {
    let filler = || Control::action(" ", Action::Noop.encode());
    let prev = if page.has_prev() {
        Control::action("⬅️", Action::Page(page.prev_offset()).encode())
    } else {
        filler()
    };
    let label = Control::action(
        format!("{}/{}", page.current_page(), page.total_pages()),
        Action::Noop.encode(),
    );
    let next = if page.has_next() {
        Control::action("➡️", Action::Page(page.next_offset()).encode())
    } else {
        filler()
    };
    vec![prev, label, next]
}

/// A page of listings in a browsed category.
pub fn browse_page(
    board: &BoardConfig,
    category: &str,
    items: &[Listing],
    page: &PageView,
) -> Screen {
    let mut text = format!(
        "📋 {category} · page {}/{}\n\n",
        page.current_page(),
        page.total_pages()
    );
    let blocks: Vec<String> = items
        .iter()
        .map(|l| listing_block(board, l, None))
        .collect();
    text.push_str(&blocks.join(&format!("{DIVIDER}\n")));

    let controls = Controls::new()
        .row(pagination_row(page))
        .row(vec![
            Control::action("⬅️ Back", Action::Back.encode()),
            Control::action("🏠 Main menu", Action::MainMenu.encode()),
        ]);
    Screen { text, controls }
}

/// The explicit empty screen for a category with no listings.
pub fn browse_empty(category: &str) -> Screen {
    let text = format!(
        "📋 {category}\n\nNothing here yet. Check back later, or post the \
         first listing yourself!"
    );
    let controls = Controls::new().row(vec![
        Control::action("⬅️ Back", Action::Back.encode()),
        Control::action("🏠 Main menu", Action::MainMenu.encode()),
    ]);
    Screen { text, controls }
}

/// A page of the caller's own listings with per-item edit/delete controls.
pub fn my_page(
    board: &BoardConfig,
    items: &[Listing],
    page: &PageView,
    now: DateTime<Utc>,
    notice: Option<&str>,
) -> Screen {
    let mut text = format!(
        "{}🗂️ Your listings · page {}/{}\n\n",
        notice_block(notice),
        page.current_page(),
        page.total_pages()
    );
    let blocks: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, l)| listing_block(board, l, Some(i as u64 + 1)))
        .collect();
    text.push_str(&blocks.join(&format!("{DIVIDER}\n")));

    let mut controls = Controls::new();
    for listing in items {
        let mut row = Vec::new();
        if listing.editable_at(now, board.edit_window()) {
            row.push(Control::action(
                format!("✏️ Edit #{}", listing.id),
                Action::Edit(listing.id).encode(),
            ));
        }
        row.push(Control::action(
            format!("🗑️ Delete #{}", listing.id),
            Action::Delete(listing.id).encode(),
        ));
        controls.rows.push(row);
    }
    controls.rows.push(pagination_row(page));
    controls.rows.push(menu_row());
    Screen { text, controls }
}

/// The empty owner screen.
pub fn my_empty(notice: Option<&str>) -> Screen {
    let text = format!(
        "{}🗂️ You have no listings yet.",
        notice_block(notice)
    );
    let controls = Controls::new()
        .row(vec![Control::action(
            "➕ New listing",
            Action::NewListing.encode(),
        )])
        .row(menu_row());
    Screen { text, controls }
}

/// Free-text prompt for the replacement description.
pub fn edit_description_prompt(listing_id: i64, notice: Option<&str>) -> Screen {
    let text = format!(
        "{}✏️ Send the new description for listing #{listing_id} (up to {} characters).",
        notice_block(notice),
        crate::validate::MAX_DESCRIPTION_CHARS
    );
    Screen {
        text,
        controls: Controls::new().row(back_row()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use doshka_core::types::{ControlPress, UserId};

    fn board() -> BoardConfig {
        BoardConfig::default()
    }

    fn listing(id: i64, age_minutes: i64, username: Option<&str>) -> Listing {
        Listing {
            id,
            owner_id: UserId(1),
            owner_display: username.map(String::from),
            kind: ListingKind::Job,
            category: "🧩 Other".into(),
            description: "Need a driver".into(),
            contact: Some("0671234567".into()),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    fn action_strings(screen: &Screen) -> Vec<String> {
        screen
            .controls
            .rows
            .iter()
            .flatten()
            .filter_map(|c| match &c.press {
                ControlPress::Action(a) => Some(a.clone()),
                ControlPress::Link(_) => None,
            })
            .collect()
    }

    #[test]
    fn main_menu_offers_all_entry_points() {
        let screen = main_menu("doshka", None);
        let actions = action_strings(&screen);
        for expected in ["add", "browse", "mine", "help"] {
            assert!(actions.iter().any(|a| a == expected), "missing {expected}");
        }
    }

    #[test]
    fn notice_is_prepended() {
        let screen = main_menu("doshka", Some("⚠️ oops"));
        assert!(screen.text.starts_with("⚠️ oops\n\n"));
    }

    #[test]
    fn listing_block_shows_owner_or_private_marker() {
        let named = listing_block(&board(), &listing(1, 0, Some("someone")), None);
        assert!(named.contains("👤 @someone"));

        let private = listing_block(&board(), &listing(1, 0, None), None);
        assert!(private.contains("👤 Private user"));
        assert!(!private.contains('@'));
    }

    #[test]
    fn listing_block_includes_contact_when_present() {
        let block = listing_block(&board(), &listing(1, 0, None), None);
        assert!(block.contains("📞 Contact: 0671234567"));

        let mut no_contact = listing(1, 0, None);
        no_contact.contact = None;
        let block = listing_block(&board(), &no_contact, None);
        assert!(!block.contains("📞"));
    }

    #[test]
    fn my_page_numbers_items_by_page_position() {
        let items = vec![listing(41, 0, None), listing(42, 0, None)];
        let page = PageView::new(2, 0, 5);
        let screen = my_page(&board(), &items, &page, Utc::now(), None);
        assert!(screen.text.contains("1. ID 41"));
        assert!(screen.text.contains("2. ID 42"));
    }

    #[test]
    fn my_page_edit_control_only_inside_window() {
        let items = vec![listing(41, 1, None), listing(42, 20, None)];
        let page = PageView::new(2, 0, 5);
        let screen = my_page(&board(), &items, &page, Utc::now(), None);
        let actions = action_strings(&screen);
        assert!(actions.iter().any(|a| a == "edit:41"));
        assert!(!actions.iter().any(|a| a == "edit:42"));
        assert!(actions.iter().any(|a| a == "del:41"));
        assert!(actions.iter().any(|a| a == "del:42"));
    }

    #[test]
    fn pagination_row_encodes_absolute_offsets() {
        let page = PageView::new(12, 5, 5);
        let row = pagination_row(&page);
        assert_eq!(row.len(), 3);
        assert_eq!(row[0].press, ControlPress::Action("page:0".into()));
        assert_eq!(row[2].press, ControlPress::Action("page:10".into()));
    }

    #[test]
    fn pagination_row_uses_fillers_at_boundaries() {
        let page = PageView::new(3, 0, 5);
        let row = pagination_row(&page);
        assert_eq!(row[0].press, ControlPress::Action("noop".into()));
        assert_eq!(row[2].press, ControlPress::Action("noop".into()));
    }

    #[test]
    fn browse_filter_marks_the_active_kind() {
        let screen = browse_filter(&board(), Some(ListingKind::Job));
        let labels: Vec<&str> = screen.controls.rows[0]
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert!(labels[1].starts_with("• "));
        assert!(!labels[0].starts_with("• "));
    }

    #[test]
    fn browse_filter_lists_every_category() {
        let board = board();
        let screen = browse_filter(&board, None);
        let actions = action_strings(&screen);
        for i in 0..board.categories.len() {
            assert!(actions.iter().any(|a| a == &format!("cat:{i}")));
        }
    }

    #[test]
    fn confirm_summary_reflects_the_draft() {
        let draft = Draft {
            kind: Some(ListingKind::Service),
            category: Some("🧩 Other".into()),
            description: Some("Fixing bikes".into()),
            contact: Some("@bike_guy".into()),
        };
        let screen = confirm_summary(&board(), &draft, None);
        assert!(screen.text.contains("Service"));
        assert!(screen.text.contains("Fixing bikes"));
        assert!(screen.text.contains("@bike_guy"));
        let actions = action_strings(&screen);
        assert!(actions.iter().any(|a| a == "confirm"));
        assert!(actions.iter().any(|a| a == "cancel"));
    }

    #[test]
    fn help_mentions_windows_from_config() {
        let screen = help(&board());
        assert!(screen.text.contains("15 minutes"));
        assert!(screen.text.contains("30 days"));
    }
}
