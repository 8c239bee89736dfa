//! Retrieved wiki passages and their relevance scores

use serde::{Deserialize, Serialize};

/// A text passage retrieved from the vector search gateway.
///
/// `distance` is the gateway's distance score, assumed normalized to [0, 1]
/// (lower is more similar). Values outside that range are carried through
/// unchanged; the derived similarity is simply allowed to leave [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub title: String,
    pub content: String,
    pub url: String,
    pub distance: f32,
}

impl Passage {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        distance: f32,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            distance,
        }
    }

    /// Relevance proxy: `1 - distance`, higher is more relevant.
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_from_distance() {
        let passage = Passage::new("Diamond Sword", "...", "https://example/w/sword", 0.2);
        assert!((passage.similarity() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_out_of_range_distance_is_not_rejected() {
        let passage = Passage::new("Odd", "...", "u", 1.3);
        assert!(passage.similarity() < 0.0);
    }
}
