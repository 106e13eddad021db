//! Request and response types for content generation.

use serde::{Deserialize, Serialize};

/// What the operator tells us about the product before generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBrief {
    /// Working name (never echoed into generated copy).
    pub name: String,
    /// Category (e.g. "t-shirt", "hoodie", "jacket").
    pub category: String,
    /// Optional base description to build on.
    #[serde(default)]
    pub description: Option<String>,
    /// Target audience (e.g. "unisex", "women").
    #[serde(default)]
    pub target_audience: Option<String>,
    /// Style direction (e.g. "casual", "streetwear").
    #[serde(default)]
    pub style: Option<String>,
}

/// Copy tone selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Urgent,
    Luxury,
}

/// Knobs for full-page generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Copy tone; model default when absent.
    #[serde(default)]
    pub tone: Option<Tone>,
    /// Target audience override.
    #[serde(default)]
    pub target_audience: Option<String>,
}

/// Single-field assistance actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAction {
    Generate,
    Improve,
    Shorten,
    Expand,
    Translate,
}

/// The structured landing-page copy the model must return.
///
/// Field names double as metafield keys in the `landing` namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingContent {
    pub title: String,
    pub hero_overtitle: String,
    pub hero_title: String,
    /// May carry inline HTML emphasis.
    pub hero_subtitle: String,
    pub description: String,
    pub bullet_1: String,
    pub bullet_2: String,
    pub bullet_3: String,
    pub angle_1_title: String,
    pub angle_1_text: String,
    pub angle_2_title: String,
    pub angle_2_text: String,
    pub angle_3_title: String,
    pub angle_3_text: String,
    pub lifestyle_main_title: String,
    pub lifestyle_left_title: String,
    pub lifestyle_left_text: String,
    pub lifestyle_right_title: String,
    pub lifestyle_right_text: String,
    pub reviews_title: String,
    /// Star counts are "1" through "5" as the model returns them.
    pub review1_stars: String,
    pub review1_author: String,
    pub review1_text: String,
    pub review2_stars: String,
    pub review2_author: String,
    pub review2_text: String,
    pub review3_stars: String,
    pub review3_author: String,
    pub review3_text: String,
}

impl LandingContent {
    /// The content as `(metafield key, value)` pairs, in page order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("title", &self.title),
            ("hero_overtitle", &self.hero_overtitle),
            ("hero_title", &self.hero_title),
            ("hero_subtitle", &self.hero_subtitle),
            ("description", &self.description),
            ("bullet_1", &self.bullet_1),
            ("bullet_2", &self.bullet_2),
            ("bullet_3", &self.bullet_3),
            ("angle_1_title", &self.angle_1_title),
            ("angle_1_text", &self.angle_1_text),
            ("angle_2_title", &self.angle_2_title),
            ("angle_2_text", &self.angle_2_text),
            ("angle_3_title", &self.angle_3_title),
            ("angle_3_text", &self.angle_3_text),
            ("lifestyle_main_title", &self.lifestyle_main_title),
            ("lifestyle_left_title", &self.lifestyle_left_title),
            ("lifestyle_left_text", &self.lifestyle_left_text),
            ("lifestyle_right_title", &self.lifestyle_right_title),
            ("lifestyle_right_text", &self.lifestyle_right_text),
            ("reviews_title", &self.reviews_title),
            ("review1_stars", &self.review1_stars),
            ("review1_author", &self.review1_author),
            ("review1_text", &self.review1_text),
            ("review2_stars", &self.review2_stars),
            ("review2_author", &self.review2_author),
            ("review2_text", &self.review2_text),
            ("review3_stars", &self.review3_stars),
            ("review3_author", &self.review3_author),
            ("review3_text", &self.review3_text),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_content_roundtrip() {
        let json = r#"{
            "title": "Classic Cotton Tee",
            "hero_overtitle": "New Arrival",
            "hero_title": "The tee you reach for first",
            "hero_subtitle": "Cut from <strong>combed cotton</strong> for every day",
            "description": "A soft everyday tee.",
            "bullet_1": "<strong>Soft</strong>: combed cotton",
            "bullet_2": "<strong>Durable</strong>: double stitching",
            "bullet_3": "<strong>Breathable</strong>: light weave",
            "angle_1_title": "Designed to be seen",
            "angle_1_text": "Clean lines.",
            "angle_2_title": "Made to move",
            "angle_2_text": "Relaxed fit.",
            "angle_3_title": "Built to last",
            "angle_3_text": "Quality fabric.",
            "lifestyle_main_title": "Your new everyday",
            "lifestyle_left_title": "Any occasion",
            "lifestyle_left_text": "Morning to night.",
            "lifestyle_right_title": "Feel at ease",
            "lifestyle_right_text": "Comfort first.",
            "reviews_title": "What our customers say",
            "review1_stars": "5",
            "review1_author": "Jamie Carter",
            "review1_text": "Softest tee I own.",
            "review2_stars": "5",
            "review2_author": "Morgan Lee",
            "review2_text": "Held up wash after wash.",
            "review3_stars": "4",
            "review3_author": "Alex Rivera",
            "review3_text": "Great fit, wish it came in more colors."
        }"#;

        let content: LandingContent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(content.title, "Classic Cotton Tee");
        assert_eq!(content.hero_title, "The tee you reach for first");
        assert_eq!(content.review3_stars, "4");

        let fields = content.fields();
        assert_eq!(fields.len(), 29);
        assert_eq!(fields.first().map(|(k, _)| *k), Some("title"));
        assert!(fields.iter().any(|(k, v)| *k == "hero_subtitle" && v.contains("<strong>")));
        assert_eq!(fields.last().map(|(k, _)| *k), Some("review3_text"));

        let back = serde_json::to_value(&content).expect("serialize");
        assert_eq!(back["review2_author"], "Morgan Lee");
    }

    #[test]
    fn test_tone_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Tone::Luxury).expect("serialize"),
            "\"luxury\""
        );
        let action: FieldAction = serde_json::from_str("\"improve\"").expect("deserialize");
        assert_eq!(action, FieldAction::Improve);
    }
}
