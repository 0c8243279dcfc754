//! schema.org `CollectionPage` description of the loaded puzzle images,
//! emitted as JSON-LD alongside the rendered gallery.

use serde::Serialize;

use crate::domain::{PuzzleId, PuzzleImage};

pub const COLLECTION_NAME: &str = "Chess Puzzles App";
pub const COLLECTION_DESCRIPTION: &str =
    "A web application for exploring chess puzzles using RDF data.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionPage {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    #[serde(rename = "mainEntity")]
    pub main_entity: Vec<ImageObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(rename = "contentUrl")]
    pub content_url: String,
    pub identifier: PuzzleId,
    #[serde(rename = "encodingFormat")]
    pub encoding_format: &'static str,
}

impl ImageObject {
    pub fn from_image(image: &PuzzleImage, image_base_url: &str) -> Self {
        Self {
            kind: "ImageObject",
            name: format!("Chess Puzzle {}", image.puzzle_id),
            content_url: format!("{image_base_url}{}", image.filename),
            identifier: image.puzzle_id.clone(),
            encoding_format: "image/png",
        }
    }
}

pub fn collection_page(images: &[PuzzleImage], image_base_url: &str) -> CollectionPage {
    CollectionPage {
        context: "https://schema.org",
        kind: "CollectionPage",
        name: COLLECTION_NAME.to_string(),
        description: COLLECTION_DESCRIPTION.to_string(),
        main_entity: images
            .iter()
            .map(|image| ImageObject::from_image(image, image_base_url))
            .collect(),
    }
}
