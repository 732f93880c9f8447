/// Offset/limit window for one listing page plus the total page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
    pub page_count: u64,
}

/// Compute the window for a 1-based `page`.
///
/// Pages past the end still yield a window (whose rows will be empty);
/// nothing is clamped. `page_count` is zero for an empty collection.
pub fn window(page: u32, page_size: u32, total: u64) -> PageWindow {
    let page_size = page_size.max(1);
    let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);

    PageWindow {
        offset,
        limit: page_size,
        page_count: total.div_ceil(u64::from(page_size)),
    }
}
