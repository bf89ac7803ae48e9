/// TMDB refuses pages beyond this
pub const MAX_PAGES: u32 = 500;

const MAX_VISIBLE: u32 = 5;

/// Page count as far as it can actually be requested
pub fn clamp_total(total_pages: u32) -> u32 {
    total_pages.min(MAX_PAGES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total: u32,
    /// Consecutive page numbers around the current one
    pub pages: Vec<u32>,
    /// A jump to page 1 precedes `pages`
    pub show_first: bool,
    pub leading_gap: bool,
    /// A jump to the last page follows `pages`
    pub show_last: bool,
    pub trailing_gap: bool,
}

/// Up to five page numbers centered on `current`. `None` when there is at most one page.
pub fn page_window(current: u32, total: u32) -> Option<PageWindow> {
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(MAX_VISIBLE / 2).max(1);
    let end = (start + MAX_VISIBLE - 1).min(total);
    if end - start + 1 < MAX_VISIBLE {
        start = (end + 1).saturating_sub(MAX_VISIBLE).max(1);
    }

    Some(PageWindow {
        current,
        total,
        pages: (start..=end).collect(),
        show_first: start > 1,
        leading_gap: start > 2,
        show_last: end < total,
        trailing_gap: end + 1 < total,
    })
}

impl PageWindow {
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// One-line rendering, e.g. `‹ 1 … 4 5 [6] 7 8 … 20 ›`
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        if self.has_previous() {
            parts.push("‹".to_string());
        }
        if self.show_first {
            parts.push("1".to_string());
        }
        if self.leading_gap {
            parts.push("…".to_string());
        }
        for &page in &self.pages {
            if page == self.current {
                parts.push(format!("[{}]", page));
            } else {
                parts.push(page.to_string());
            }
        }
        if self.trailing_gap {
            parts.push("…".to_string());
        }
        if self.show_last {
            parts.push(self.total.to_string());
        }
        if self.has_next() {
            parts.push("›".to_string());
        }
        parts.join(" ")
    }
}
