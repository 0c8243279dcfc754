use crate::domain::{PuzzleId, PuzzleImage};

/// Images rendered per gallery page; also the cap on ids sent for
/// recommendations.
pub const PAGE_SIZE: usize = 6;

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

pub fn page(images: &[PuzzleImage], page: usize) -> &[PuzzleImage] {
    let start = page.saturating_mul(PAGE_SIZE).min(images.len());
    let end = start.saturating_add(PAGE_SIZE).min(images.len());
    &images[start..end]
}

pub fn visible_ids(images: &[PuzzleImage], page_index: usize) -> Vec<PuzzleId> {
    page(images, page_index)
        .iter()
        .map(|image| image.puzzle_id.clone())
        .collect()
}
