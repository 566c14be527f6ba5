//! Pagination over a derived collection.
//!
//! The paginator tracks a 1-based current page and a page size. It is fed the
//! length of whatever collection it pages (usually the output of a
//! [`FilterView`](crate::filter::FilterView)) and keeps the current page inside
//! `[1, max(1, total_pages)]` as that length changes. A page requested before
//! any length is known is held as-is and clamped by the next
//! [`paginate`](Paginator::paginate).
//!
//! # Example
//!
//! ```rust
//! use dashkit::paginator::Paginator;
//!
//! let sales: Vec<u32> = (1..=12).collect();
//! let mut paginator = Paginator::new().per_page(5);
//!
//! paginator.handle_page_change(3);
//! let page = paginator.paginate(&sales);
//! assert_eq!(page.items, &[11, 12]);
//! assert_eq!(page.total_pages, 3);
//!
//! // Requests past the end are clamped.
//! paginator.handle_page_change(99);
//! assert_eq!(paginator.page(), 3);
//!
//! // Changing the page size always returns to the first page.
//! paginator.handle_items_per_page_change(10);
//! assert_eq!(paginator.page(), 1);
//! ```

use crate::key::{Binding, matches};
use crate::message::{KeyMsg, Message};

/// Page size used when none is configured.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Pagination display type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Type {
    /// Arabic numerals: "1/5"
    #[default]
    Arabic,
    /// Dot indicators: "●○○○○"
    Dots,
}

/// Key bindings for page navigation.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Binding to go to previous page.
    pub prev_page: Binding,
    /// Binding to go to next page.
    pub next_page: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            prev_page: Binding::new()
                .keys(&["pgup", "left", "h"])
                .help("←/h", "prev page"),
            next_page: Binding::new()
                .keys(&["pgdown", "right", "l"])
                .help("→/l", "next page"),
        }
    }
}

/// One page of a collection plus the numbers needed to render its footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on the current page.
    pub items: &'a [T],
    /// Current page, 1-based.
    pub current_page: usize,
    /// Number of pages; 0 for an empty collection.
    pub total_pages: usize,
    /// Length of the paged collection.
    pub total_items: usize,
    /// Page size.
    pub items_per_page: usize,
}

/// Pagination state.
#[derive(Debug, Clone)]
pub struct Paginator {
    /// Display type (Arabic or Dots).
    pub display_type: Type,
    /// Current page (1-based).
    page: usize,
    /// Items per page.
    per_page: usize,
    /// Length of the paged collection, once known.
    total_items: Option<usize>,
    /// Character for active page in Dots mode.
    pub active_dot: String,
    /// Character for inactive pages in Dots mode.
    pub inactive_dot: String,
    /// Format string for Arabic mode.
    pub arabic_format: String,
    /// Key bindings.
    pub key_map: KeyMap,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    /// Creates a paginator on page 1 with the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            display_type: Type::Arabic,
            page: 1,
            per_page: DEFAULT_ITEMS_PER_PAGE,
            total_items: None,
            active_dot: "•".to_string(),
            inactive_dot: "○".to_string(),
            arabic_format: "{}/{}".to_string(),
            key_map: KeyMap::default(),
        }
    }

    /// Sets the display type.
    #[must_use]
    pub fn display_type(mut self, t: Type) -> Self {
        self.display_type = t;
        self
    }

    /// Sets the number of items per page (at least 1).
    #[must_use]
    pub fn per_page(mut self, n: usize) -> Self {
        self.per_page = n.max(1);
        self
    }

    /// Sets the length of the paged collection.
    #[must_use]
    pub fn total_items(mut self, n: usize) -> Self {
        self.set_total_items(n);
        self
    }

    /// Returns the current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the items per page.
    #[must_use]
    pub fn get_per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the length of the paged collection.
    #[must_use]
    pub fn get_total_items(&self) -> usize {
        self.total_items.unwrap_or(0)
    }

    /// Returns `ceil(total_items / per_page)`; 0 when there are no items.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.get_total_items().div_ceil(self.per_page)
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Updates the collection length, pulling the current page back into range.
    pub fn set_total_items(&mut self, n: usize) {
        self.total_items = Some(n);
        let last = self.last_page();
        if self.page > last {
            tracing::debug!(from = self.page, to = last, total_items = n, "page clamped");
            self.page = last;
        }
    }

    /// Moves to `page`, clamped into `[1, total_pages]` (or 1 when empty).
    ///
    /// Before the collection length is known only the lower bound applies.
    pub fn handle_page_change(&mut self, page: usize) {
        self.page = match self.total_items {
            Some(_) => page.clamp(1, self.last_page()),
            None => page.max(1),
        };
    }

    /// Changes the page size and returns to page 1.
    pub fn handle_items_per_page_change(&mut self, n: usize) {
        self.per_page = n.max(1);
        self.page = 1;
    }

    /// Returns the `[start, end)` bounds of the current page in a collection of
    /// `length` items.
    #[must_use]
    pub fn get_slice_bounds(&self, length: usize) -> (usize, usize) {
        let start = ((self.page - 1) * self.per_page).min(length);
        let end = (start + self.per_page).min(length);
        (start, end)
    }

    /// Returns the number of items on the current page.
    #[must_use]
    pub fn items_on_page(&self, length: usize) -> usize {
        let (start, end) = self.get_slice_bounds(length);
        end - start
    }

    /// Pages `data`, first syncing the collection length from it.
    pub fn paginate<'a, T>(&mut self, data: &'a [T]) -> Page<'a, T> {
        self.set_total_items(data.len());
        let (start, end) = self.get_slice_bounds(data.len());
        Page {
            items: &data[start..end],
            current_page: self.page,
            total_pages: self.total_pages(),
            total_items: data.len(),
            items_per_page: self.per_page,
        }
    }

    /// Navigates to the previous page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Navigates to the next page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Returns whether we're on the last page.
    #[must_use]
    pub fn on_last_page(&self) -> bool {
        self.total_items.is_some() && self.page >= self.last_page()
    }

    /// Returns whether we're on the first page.
    #[must_use]
    pub fn on_first_page(&self) -> bool {
        self.page == 1
    }

    /// Updates the paginator based on key input.
    pub fn update(&mut self, msg: Message) {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if matches(key, &[&self.key_map.next_page]) {
                self.next_page();
            } else if matches(key, &[&self.key_map.prev_page]) {
                self.prev_page();
            }
        }
    }

    /// Renders the pagination display.
    #[must_use]
    pub fn view(&self) -> String {
        match self.display_type {
            Type::Dots => self.dots_view(),
            Type::Arabic => self.arabic_view(),
        }
    }

    fn dots_view(&self) -> String {
        (1..=self.total_pages())
            .map(|i| {
                if i == self.page {
                    self.active_dot.as_str()
                } else {
                    self.inactive_dot.as_str()
                }
            })
            .collect()
    }

    fn arabic_view(&self) -> String {
        let total = self.total_pages();
        let current = if total == 0 { 0 } else { self.page };
        self.arabic_format
            .replacen("{}", &current.to_string(), 1)
            .replacen("{}", &total.to_string(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginator_new() {
        let p = Paginator::new();
        assert_eq!(p.page(), 1);
        assert_eq!(p.get_per_page(), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(p.total_pages(), 0);
    }

    #[test]
    fn test_per_page_minimum_is_one() {
        let p = Paginator::new().per_page(0);
        assert_eq!(p.get_per_page(), 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let mut p = Paginator::new().per_page(10);
        p.set_total_items(25);
        assert_eq!(p.total_pages(), 3);
        p.set_total_items(20);
        assert_eq!(p.total_pages(), 2);
        p.set_total_items(0);
        assert_eq!(p.total_pages(), 0);
    }

    #[test]
    fn test_paginator_navigation() {
        let mut p = Paginator::new().per_page(1).total_items(5);

        assert!(p.on_first_page());
        assert!(!p.on_last_page());

        p.next_page();
        assert_eq!(p.page(), 2);

        p.next_page();
        p.next_page();
        p.next_page();
        assert_eq!(p.page(), 5);
        assert!(p.on_last_page());

        // Should not go past last page
        p.next_page();
        assert_eq!(p.page(), 5);

        p.prev_page();
        assert_eq!(p.page(), 4);

        p.handle_page_change(1);
        p.prev_page();
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_page_change_is_clamped() {
        let mut p = Paginator::new().per_page(3).total_items(10);
        p.handle_page_change(0);
        assert_eq!(p.page(), 1);
        p.handle_page_change(4);
        assert_eq!(p.page(), 4);
        p.handle_page_change(40);
        assert_eq!(p.page(), 4);
    }

    #[test]
    fn test_page_change_on_empty_collection_stays_on_one() {
        let mut p = Paginator::new().total_items(0);
        p.handle_page_change(3);
        assert_eq!(p.page(), 1);
        assert!(p.on_last_page());
    }

    #[test]
    fn test_shrinking_collection_clamps_page() {
        let mut p = Paginator::new().per_page(5).total_items(50);
        p.handle_page_change(10);
        p.set_total_items(12);
        assert_eq!(p.page(), 3);
        p.set_total_items(0);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_items_per_page_change_resets_page() {
        let mut p = Paginator::new().per_page(2).total_items(10);
        p.handle_page_change(4);
        p.handle_items_per_page_change(3);
        assert_eq!(p.page(), 1);
        assert_eq!(p.get_per_page(), 3);
    }

    #[test]
    fn test_paginator_slice_bounds() {
        let mut p = Paginator::new().per_page(3).total_items(10);

        assert_eq!(p.get_slice_bounds(10), (0, 3));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (3, 6));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (6, 9));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (9, 10));
        assert_eq!(p.items_on_page(10), 1);
    }

    #[test]
    fn test_paginate_reports_totals() {
        let data: Vec<char> = "abcdefg".chars().collect();
        let mut p = Paginator::new().per_page(3);
        p.handle_page_change(2);

        let page = p.paginate(&data);
        assert_eq!(page.items, &['d', 'e', 'f']);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 7);
        assert_eq!(page.items_per_page, 3);
    }

    #[test]
    fn test_page_change_before_paginate_is_kept() {
        let sales: Vec<u32> = (1..=12).collect();
        let mut p = Paginator::new().per_page(5);
        p.handle_page_change(3);
        assert_eq!(p.page(), 3);

        let page = p.paginate(&sales);
        assert_eq!(page.items, &[11, 12]);
        assert_eq!(page.current_page, 3);
        assert_eq!(p.view(), "3/3");
    }

    #[test]
    fn test_page_requested_past_unknown_end_clamps_on_paginate() {
        let sales: Vec<u32> = (1..=12).collect();
        let mut p = Paginator::new().per_page(5);
        p.handle_page_change(9);
        let page = p.paginate(&sales);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items, &[11, 12]);
    }

    #[test]
    fn test_paginate_empty() {
        let data: Vec<u8> = Vec::new();
        let mut p = Paginator::new();
        let page = p.paginate(&data);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_key_navigation() {
        let mut p = Paginator::new().per_page(1).total_items(3);
        p.update(Message::new(KeyMsg::new("right")));
        assert_eq!(p.page(), 2);
        p.update(Message::new(KeyMsg::new("pgdown")));
        assert_eq!(p.page(), 3);
        p.update(Message::new(KeyMsg::new("h")));
        assert_eq!(p.page(), 2);
        p.update(Message::new(KeyMsg::new("x")));
        assert_eq!(p.page(), 2);
    }

    #[test]
    fn test_paginator_arabic_view() {
        let mut p = Paginator::new().per_page(1).total_items(5);
        assert_eq!(p.view(), "1/5");
        p.set_total_items(0);
        assert_eq!(p.view(), "0/0");
    }

    #[test]
    fn test_paginator_dots_view() {
        let mut p = Paginator::new()
            .display_type(Type::Dots)
            .per_page(1)
            .total_items(5);
        assert_eq!(p.view(), "•○○○○");

        p.next_page();
        assert_eq!(p.view(), "○•○○○");
    }
}
