/// How a finished generation is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    /// Script text with an audio player.
    Audio,
    /// Generated image with an optional caption.
    Image,
    /// Text split into flash cards.
    Cards,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductConfig {
    /// Route segment, e.g. `/create/santa`.
    pub slug: &'static str,
    /// Identifier sent to the remote API on start.
    pub product_id: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    pub storage_key: &'static str,
    pub progress_slots: usize,
    pub asks_first_name: bool,
    pub first_name_label: &'static str,
    pub review_before_generate: bool,
    pub start_label: &'static str,
    pub generate_label: &'static str,
    pub result_kind: ResultKind,
}

pub const SANTA: ProductConfig = ProductConfig {
    slug: "santa",
    product_id: "santa_message",
    title: "A message from Santa",
    tagline: "A personal audio message from the North Pole.",
    storage_key: "santa_session_progress",
    progress_slots: 7,
    asks_first_name: true,
    first_name_label: "Child's first name",
    review_before_generate: false,
    start_label: "Start the interview",
    generate_label: "Santa is recording your message...",
    result_kind: ResultKind::Audio,
};

pub const VISION_BOARD: ProductConfig = ProductConfig {
    slug: "vision-board",
    product_id: "vision_board",
    title: "Your vision board",
    tagline: "Answer a few questions and we'll paint your year.",
    storage_key: "visionboard_session_progress",
    progress_slots: 10,
    asks_first_name: false,
    first_name_label: "",
    review_before_generate: true,
    start_label: "Begin",
    generate_label: "Painting your vision board...",
    result_kind: ResultKind::Image,
};

pub const LESSONS: ProductConfig = ProductConfig {
    slug: "lessons",
    product_id: "lessons",
    title: "Flash-card lessons",
    tagline: "Tell us what you want to learn, get a deck made for you.",
    storage_key: "lessons_session_progress",
    progress_slots: 10,
    asks_first_name: false,
    first_name_label: "",
    review_before_generate: false,
    start_label: "Build my deck",
    generate_label: "Writing your cards...",
    result_kind: ResultKind::Cards,
};

pub static ALL_PRODUCTS: [&ProductConfig; 3] = [&SANTA, &VISION_BOARD, &LESSONS];

pub fn by_slug(slug: &str) -> Option<&'static ProductConfig> {
    ALL_PRODUCTS.iter().copied().find(|p| p.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugs_resolve_to_their_product() {
        assert_eq!(by_slug("santa").map(|p| p.product_id), Some("santa_message"));
        assert_eq!(by_slug("vision-board").map(|p| p.product_id), Some("vision_board"));
        assert!(by_slug("planner").is_none());
    }

    #[test]
    fn storage_keys_are_unique_per_product() {
        let keys: HashSet<_> = ALL_PRODUCTS.iter().map(|p| p.storage_key).collect();
        assert_eq!(keys.len(), ALL_PRODUCTS.len());
    }
}
