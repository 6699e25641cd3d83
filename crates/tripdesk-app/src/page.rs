// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::num::NonZeroUsize;

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    index: usize,
    size: NonZeroUsize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    pub const fn new(size: NonZeroUsize) -> Self {
        Self { index: 0, size }
    }

    pub const fn index(self) -> usize {
        self.index
    }

    pub const fn size(self) -> usize {
        self.size.get()
    }

    pub const fn offset(self) -> usize {
        self.index.saturating_mul(self.size.get())
    }

    /// Number of pages for `total` items. An empty set still has one (empty)
    /// page so that index 0 is always addressable.
    pub const fn page_count(self, total: usize) -> usize {
        if total == 0 {
            1
        } else {
            total.div_ceil(self.size.get())
        }
    }

    pub fn slice<T>(self, items: &[T]) -> &[T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.size.get()).min(items.len());
        &items[start..end]
    }

    /// Returns true when the index moved.
    pub fn reset(&mut self) -> bool {
        let moved = self.index != 0;
        self.index = 0;
        moved
    }

    pub fn clamp(&mut self, total: usize) -> bool {
        let last = self.page_count(total) - 1;
        if self.index > last {
            self.index = last;
            return true;
        }
        false
    }

    pub fn go_to(&mut self, index: usize, total: usize) -> bool {
        let target = index.min(self.page_count(total) - 1);
        let moved = target != self.index;
        self.index = target;
        moved
    }

    pub fn next(&mut self, total: usize) -> bool {
        self.go_to(self.index.saturating_add(1), total)
    }

    pub fn prev(&mut self, total: usize) -> bool {
        self.go_to(self.index.saturating_sub(1), total)
    }
}

#[cfg(test)]
mod tests {
    use super::PageState;
    use std::num::NonZeroUsize;

    fn page_of(size: usize) -> PageState {
        PageState::new(NonZeroUsize::new(size).expect("non-zero size"))
    }

    #[test]
    fn pages_concatenate_back_to_the_input() {
        let items = (0..23).collect::<Vec<_>>();
        for size in 1..=25 {
            let mut page = page_of(size);
            let mut rebuilt = Vec::new();
            for index in 0..page.page_count(items.len()) {
                page.go_to(index, items.len());
                rebuilt.extend_from_slice(page.slice(&items));
            }
            assert_eq!(rebuilt, items, "page size {size}");
        }
    }

    #[test]
    fn second_page_of_size_one_holds_second_item() {
        let items = ["grand", "beach"];
        let mut page = page_of(1);
        assert!(page.go_to(1, items.len()));
        assert_eq!(page.slice(&items), &["beach"]);
    }

    #[test]
    fn empty_set_has_one_empty_page() {
        let page = page_of(10);
        let items: [u8; 0] = [];
        assert_eq!(page.page_count(0), 1);
        assert!(page.slice(&items).is_empty());
    }

    #[test]
    fn navigation_stays_within_bounds() {
        let mut page = page_of(10);
        assert!(!page.prev(35));
        assert!(page.next(35));
        assert!(page.next(35));
        assert!(page.next(35));
        assert!(!page.next(35));
        assert_eq!(page.index(), 3);
        assert!(!page.go_to(99, 35));
    }

    #[test]
    fn clamp_pulls_index_back_after_shrink() {
        let mut page = page_of(10);
        page.go_to(2, 25);
        assert!(page.clamp(20));
        assert_eq!(page.index(), 1);
        assert!(!page.clamp(20));
    }

    #[test]
    fn stale_index_slices_empty_instead_of_panicking() {
        let mut page = page_of(5);
        page.go_to(4, 25);
        let shrunk = [1, 2, 3];
        assert!(page.slice(&shrunk).is_empty());
    }
}
