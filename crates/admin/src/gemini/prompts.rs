//! Prompt templates for content generation.
//!
//! The guardrails are deliberate: generated copy must stay brand-free so the
//! same landing blocks work for any similar product.

use super::types::{FieldAction, GenerationOptions, ProductBrief, Tone};

pub const SYSTEM_PROMPT: &str = "\
You are an expert copywriter specialized in e-commerce landing pages.

CRITICAL RULES:
- NEVER mention brand names, product names, store names or e-commerce sites
- NEVER reference any specific brand, company or website
- Focus ONLY on product characteristics and features
- Keep content generic so it can be used for any similar product

IMPORTANT guidelines:
- ALWAYS write in fluent, natural English
- Use a persuasive but credible tone
- Include effective call-to-actions
- You can use basic HTML: <strong>, <em>, <br>
- For bullet points, format as <strong>Keyword</strong>: brief description
- Emphasize BENEFITS, not just features
- Avoid generic phrases and cliches
- Create urgency without being aggressive";

pub const fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => {
            "Use a professional and authoritative tone, suitable for a demanding audience."
        }
        Tone::Friendly => "Use a friendly and conversational tone, as if talking to a friend.",
        Tone::Urgent => "Create a sense of urgency and scarcity, pushing for immediate action.",
        Tone::Luxury => {
            "Use an elegant and sophisticated tone, emphasizing exclusivity and premium quality."
        }
    }
}

/// Build the full landing-page generation prompt.
#[must_use]
pub fn landing_prompt(brief: &ProductBrief, options: &GenerationOptions) -> String {
    let tone = options.tone.map(tone_instruction).unwrap_or_default();
    let audience = options
        .target_audience
        .as_deref()
        .or(brief.target_audience.as_deref())
        .unwrap_or("unisex");
    let style = brief.style.as_deref().unwrap_or("casual");
    let base_description = brief
        .description
        .as_deref()
        .map(|d| format!("- Base description: {d}\n"))
        .unwrap_or_default();

    format!(
        r#"{SYSTEM_PROMPT}

PRODUCT INFO:
- Category: {category}
- Target: {audience}
- Style: {style}
{base_description}{tone}

GENERATE THE FOLLOWING CONTENT:

1. TITLE: A generic catchy product title (NO brand names, just product type)
2. HERO SECTION:
   - OVERTITLE: small text above the hero title (e.g. 'New Arrival')
   - TITLE: main hero headline, impactful
   - SUBTITLE: one line, <strong> on the key phrase
3. DESCRIPTION: Very short description (1 sentence MAX)
4. BULLETS (3): "<strong>Keyword</strong>: brief description", one short line each,
   concrete about features (fabric, construction, details)
5. ANGLES (3 sections, STRICTLY in this order):
   - ANGLE 1 - DESIGN: aesthetics, style, visual appeal, design details
   - ANGLE 2 - FIT & COMFORT: fit, comfort, functionality, wearability
   - ANGLE 3 - MATERIALS: fabric quality, materials, durability, feel
   3-4 sentences each, emotional and engaging, <strong> on 2-3 key phrases
6. LIFESTYLE SECTION:
   - MAIN TITLE: emotional, aspirational headline (short)
   - LEFT (Versatility/Occasions): title + 3-4 sentences on best moments to wear it
   - RIGHT (Lifestyle/Comfort): title + 3-4 sentences on ease, confidence, self-expression
7. REVIEWS: section title plus 3 authentic-sounding customer reviews.
   Stars are a string from "1" to "5"; make the third review 4 stars with a
   minor constructive note. Plausible full names, NO brand names in the text.

RESPOND IN THIS EXACT JSON FORMAT (no markdown, no code blocks, just raw JSON):
{{
  "title": "...",
  "hero_overtitle": "...",
  "hero_title": "...",
  "hero_subtitle": "...",
  "description": "...",
  "bullet_1": "...",
  "bullet_2": "...",
  "bullet_3": "...",
  "angle_1_title": "...",
  "angle_1_text": "...",
  "angle_2_title": "...",
  "angle_2_text": "...",
  "angle_3_title": "...",
  "angle_3_text": "...",
  "lifestyle_main_title": "...",
  "lifestyle_left_title": "...",
  "lifestyle_left_text": "...",
  "lifestyle_right_title": "...",
  "lifestyle_right_text": "...",
  "reviews_title": "...",
  "review1_stars": "5",
  "review1_author": "...",
  "review1_text": "...",
  "review2_stars": "5",
  "review2_author": "...",
  "review2_text": "...",
  "review3_stars": "4",
  "review3_author": "...",
  "review3_text": "..."
}}"#,
        category = brief.category,
    )
}

/// Build a single-field assistance prompt.
#[must_use]
pub fn field_prompt(
    field_label: &str,
    product_context: &str,
    current_value: Option<&str>,
    action: FieldAction,
) -> String {
    let current = current_value.unwrap_or_default();
    let instruction = match action {
        FieldAction::Generate => format!(
            "Generate new content for the \"{field_label}\" field based on the product context."
        ),
        FieldAction::Improve => {
            format!("Improve and make this text more persuasive: \"{current}\"")
        }
        FieldAction::Shorten => {
            format!("Make this text more concise while keeping the key message: \"{current}\"")
        }
        FieldAction::Expand => {
            format!("Expand and enrich this text with more details: \"{current}\"")
        }
        FieldAction::Translate => format!("Translate this text to English: \"{current}\""),
    };

    format!(
        "{SYSTEM_PROMPT}\n\nProduct context: {product_context}\n\n{instruction}\n\n\
         IMPORTANT: Reply ONLY with the generated text, no quotes, explanations or extra formatting."
    )
}

/// Build the title-suggestions prompt.
#[must_use]
pub fn titles_prompt(product_description: &str, count: usize) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\nGenerate {count} catchy product titles for this product:\n\
         {product_description}\n\n\
         Reply ONLY with a JSON array of strings, no other text:\n\
         [\"Title 1\", \"Title 2\", ...]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_prompt_includes_brief_and_tone() {
        let brief = ProductBrief {
            name: "ACME Tee".to_string(),
            category: "t-shirt".to_string(),
            description: Some("Soft cotton tee".to_string()),
            target_audience: None,
            style: Some("streetwear".to_string()),
        };
        let options = GenerationOptions {
            tone: Some(Tone::Urgent),
            target_audience: Some("men".to_string()),
        };

        let prompt = landing_prompt(&brief, &options);
        assert!(prompt.contains("Category: t-shirt"));
        assert!(prompt.contains("Target: men"));
        assert!(prompt.contains("Base description: Soft cotton tee"));
        assert!(prompt.contains("sense of urgency"));
        // The product's working name must never leak into the prompt body.
        assert!(!prompt.contains("ACME"));
    }

    #[test]
    fn test_landing_prompt_requests_hero_and_reviews() {
        let brief = ProductBrief {
            name: "Tee".to_string(),
            category: "t-shirt".to_string(),
            description: None,
            target_audience: None,
            style: None,
        };
        let prompt = landing_prompt(&brief, &GenerationOptions::default());
        assert!(prompt.contains("\"hero_overtitle\""));
        assert!(prompt.contains("\"hero_subtitle\""));
        assert!(prompt.contains("\"reviews_title\""));
        assert!(prompt.contains("\"review3_text\""));
    }

    #[test]
    fn test_field_prompt_action_wording() {
        let prompt = field_prompt("Hero subtitle", "cotton tee", Some("Nice tee"), FieldAction::Shorten);
        assert!(prompt.contains("more concise"));
        assert!(prompt.contains("Nice tee"));
    }
}
