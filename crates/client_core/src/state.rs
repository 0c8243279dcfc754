use serde::Serialize;
use shared::{
    domain::{Backend, PuzzleImage, Recommendation},
    filters::{ExpansionState, FilterSelection},
};

/// Where the view sits in the browse/search/filter flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Initial,
    Browsing,
    BrowsingFiltered,
    Searched,
    SearchedFiltered,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    /// What the gallery renders right now.
    pub images: Vec<PuzzleImage>,
    /// The unfiltered startup load; filter base until a search happens.
    pub original_images: Vec<PuzzleImage>,
    /// The latest search response; filter base once a search happened.
    pub search_results: Vec<PuzzleImage>,
    pub search_performed: bool,
    pub recommendations: Vec<Recommendation>,
    pub selected_filters: FilterSelection,
    pub expanded_sections: ExpansionState,
    pub recommendation_backend: Backend,
    pub game_state_backend: Backend,
    pub is_loading_images: bool,
    pub is_loading_recommendations: bool,
    pub initial_loaded: bool,
    pub filter_applied: bool,
}

impl ViewState {
    pub fn phase(&self) -> ViewPhase {
        match (self.search_performed, self.filter_applied) {
            (true, true) => ViewPhase::SearchedFiltered,
            (true, false) => ViewPhase::Searched,
            (false, true) => ViewPhase::BrowsingFiltered,
            (false, false) if self.initial_loaded => ViewPhase::Browsing,
            (false, false) => ViewPhase::Initial,
        }
    }

    /// The set a filter narrows: the last search response once a search has
    /// happened, the startup load otherwise. Never `images`.
    pub fn filter_base(&self) -> &[PuzzleImage] {
        if self.search_performed {
            &self.search_results
        } else {
            &self.original_images
        }
    }

    pub fn reset_filters(&mut self) {
        self.selected_filters = FilterSelection::default();
        self.expanded_sections = ExpansionState::default();
    }
}

/// Orders responses that write the same field. Each request takes a ticket
/// when issued; a response is applied only if its ticket is newer than the
/// last one applied.
#[derive(Debug, Default)]
pub(crate) struct ResponseSequence {
    issued: u64,
    applied: u64,
}

impl ResponseSequence {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub(crate) fn try_apply(&mut self, ticket: u64) -> bool {
        if ticket > self.applied {
            self.applied = ticket;
            true
        } else {
            false
        }
    }

    /// Makes every ticket issued so far stale.
    pub(crate) fn invalidate_pending(&mut self) {
        self.applied = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_flags() {
        let mut view = ViewState::default();
        assert_eq!(view.phase(), ViewPhase::Initial);

        view.initial_loaded = true;
        assert_eq!(view.phase(), ViewPhase::Browsing);

        view.filter_applied = true;
        assert_eq!(view.phase(), ViewPhase::BrowsingFiltered);

        view.search_performed = true;
        assert_eq!(view.phase(), ViewPhase::SearchedFiltered);

        view.filter_applied = false;
        assert_eq!(view.phase(), ViewPhase::Searched);
    }

    #[test]
    fn filter_base_switches_on_search() {
        let mut view = ViewState {
            original_images: vec![PuzzleImage::new(1, "a.png")],
            search_results: vec![PuzzleImage::new(5, "e.png")],
            images: vec![PuzzleImage::new(9, "i.png")],
            ..ViewState::default()
        };
        assert_eq!(view.filter_base(), view.original_images.as_slice());

        view.search_performed = true;
        assert_eq!(view.filter_base(), view.search_results.as_slice());
    }

    #[test]
    fn sequence_discards_older_tickets() {
        let mut seq = ResponseSequence::default();
        let first = seq.issue();
        let second = seq.issue();

        assert!(seq.try_apply(second));
        assert!(!seq.try_apply(first));

        let third = seq.issue();
        seq.invalidate_pending();
        assert!(!seq.try_apply(third));

        let fourth = seq.issue();
        assert!(seq.try_apply(fourth));
    }
}
