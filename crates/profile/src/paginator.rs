use serde::Serialize;

/// Most page buttons ever rendered at once.
pub const MAX_PAGE_BUTTONS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> PageSlice<T> {
    /// 1-based index of the first visible item, 0 when nothing is visible.
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last visible item.
    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + self.items.len()
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}

/// True when `page` is inside `[1, total_pages]`.
pub fn is_valid_page(page: usize, total_pages: usize) -> bool {
    (1..=total_pages).contains(&page)
}

/// Slices `[(page-1)*size, page*size)` out of `items`, clamped to what exists.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PageSlice<T> {
    let page = page.max(1);
    let total_items = items.len();
    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    PageSlice {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages: total_pages(total_items, page_size),
    }
}

/// Page numbers to render as buttons: everything when there are at most seven
/// pages, otherwise a seven-wide window around `current` pinned at both ends.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total <= MAX_PAGE_BUTTONS {
        return (1..=total).collect();
    }
    let half = MAX_PAGE_BUTTONS / 2;
    let start = if current <= half + 1 {
        1
    } else if current + half >= total {
        total - MAX_PAGE_BUTTONS + 1
    } else {
        current - half
    };
    (start..start + MAX_PAGE_BUTTONS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_make_three_pages() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(total_pages(items.len(), 10), 3);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(last.total_pages, 3);
        assert_eq!((last.first_index(), last.last_index()), (21, 25));
        assert!(last.has_previous());
        assert!(!last.has_next());

        assert!(!is_valid_page(4, last.total_pages));
        assert!(!is_valid_page(0, last.total_pages));
        assert!(is_valid_page(3, last.total_pages));
    }

    #[test]
    fn out_of_range_page_is_empty_not_a_panic() {
        let items: Vec<u32> = (1..=5).collect();
        let slice = paginate(&items, 9, 10);
        assert!(slice.items.is_empty());
        assert_eq!(slice.first_index(), 0);
    }

    #[test]
    fn empty_input_has_zero_pages() {
        let slice = paginate::<u32>(&[], 1, 10);
        assert_eq!(slice.total_pages, 0);
        assert!(!slice.has_next());
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn short_listings_show_every_page() {
        assert_eq!(page_window(1, 1), vec![1]);
        assert_eq!(page_window(5, 7), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn window_slides_around_the_current_page() {
        assert_eq!(page_window(10, 20), (7..=13).collect::<Vec<_>>());
        assert_eq!(page_window(5, 20), (2..=8).collect::<Vec<_>>());
    }

    #[test]
    fn window_is_pinned_at_both_ends() {
        assert_eq!(page_window(1, 20), (1..=7).collect::<Vec<_>>());
        assert_eq!(page_window(4, 20), (1..=7).collect::<Vec<_>>());
        assert_eq!(page_window(17, 20), (14..=20).collect::<Vec<_>>());
        assert_eq!(page_window(20, 20), (14..=20).collect::<Vec<_>>());
    }
}
