//! Deterministic content generation for product listings.
//!
//! Everything here is pure string templating over static tables. A real
//! generative backend can later replace these functions behind the same
//! route contract without touching callers.

use serde::Serialize;

use crate::error::{AppError, Result};

const TAG_VOCABULARY: &[&str] = &[
    "handmade",
    "artisan",
    "traditional",
    "authentic",
    "cultural",
    "heritage",
    "vintage",
    "rustic",
    "ethnic",
    "folk art",
    "handcrafted",
    "sustainable",
    "eco-friendly",
    "unique",
    "decorative",
    "gift",
];

const MAX_SUGGESTED_TAGS: usize = 8;

const MARKETING_KEYWORDS: &[&str] = &[
    "handmade",
    "artisan",
    "traditional",
    "heritage",
    "authentic",
    "cultural",
    "unique",
    "sustainable",
    "eco-friendly",
    "one-of-a-kind",
];

const TARGET_AUDIENCES: &[&str] = &[
    "Art enthusiasts",
    "Cultural collectors",
    "Home decorators",
    "Gift seekers",
    "Sustainable living advocates",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

pub const DEFAULT_PRICE_RANGE: PriceRange = PriceRange { min: 500, max: 5000 };

const PRICE_RANGES: &[(&str, PriceRange)] = &[
    ("Pottery & Ceramics", PriceRange { min: 500, max: 3000 }),
    ("Textiles & Fabrics", PriceRange { min: 800, max: 5000 }),
    ("Jewelry & Accessories", PriceRange { min: 1200, max: 8000 }),
    ("Woodwork & Furniture", PriceRange { min: 2000, max: 15000 }),
    ("Metalwork", PriceRange { min: 1000, max: 6000 }),
    ("Leather Goods", PriceRange { min: 800, max: 4000 }),
    ("Art & Paintings", PriceRange { min: 1500, max: 10000 }),
    ("Sculptures", PriceRange { min: 2000, max: 12000 }),
];

const CRAFT_TECHNIQUES: &[(&str, &[&str])] = &[
    (
        "Pottery & Ceramics",
        &["wheel throwing", "hand building", "glazing", "firing"],
    ),
    (
        "Textiles & Fabrics",
        &["weaving", "dyeing", "block printing", "embroidery"],
    ),
    (
        "Jewelry & Accessories",
        &["metalwork", "stone setting", "engraving", "polishing"],
    ),
    (
        "Woodwork & Furniture",
        &["carving", "joinery", "finishing", "inlay work"],
    ),
    ("Metalwork", &["forging", "casting", "etching", "patination"]),
];

const DEFAULT_TECHNIQUES: &[&str] = &[
    "traditional handcrafting",
    "artisan techniques",
    "heritage methods",
];

#[derive(Debug, Serialize)]
pub struct ContentAnalysis {
    pub generated_description: String,
    pub story: String,
    pub suggested_tags: Vec<String>,
    pub craft_techniques: Vec<String>,
    pub cultural_context: String,
    pub marketing_keywords: Vec<String>,
    pub target_audience: Vec<String>,
    pub price_range: PriceRange,
}

pub struct StoryInput<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub materials: Option<&'a str>,
    pub technique: Option<&'a str>,
    pub region: Option<&'a str>,
    pub artisan_background: Option<&'a str>,
}

/// Templated analysis of a free-text product description. Requires at least
/// one of description or category.
pub fn analyze(description: &str, category: &str) -> Result<ContentAnalysis> {
    if description.trim().is_empty() && category.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Either description or category is required".to_string(),
        ));
    }

    let craft_label = if category.is_empty() {
        "traditional craftsmanship"
    } else {
        category
    };

    let generated_description = format!(
        "This exquisite handcrafted piece showcases the timeless artistry and \
         cultural heritage of traditional Indian craftsmanship. {} Each detail \
         reflects hours of meticulous work and generations of inherited knowledge.",
        description
    );

    let cultural_context = format!(
        "This craft represents the rich cultural traditions of India, where \
         artisans have been preserving ancient techniques for centuries. The \
         piece embodies the spirit of {} that has been passed down through \
         generations.",
        craft_label
    );

    let story = generate_story(&StoryInput {
        title: "handcrafted piece",
        category: (!category.is_empty()).then_some(category),
        materials: None,
        technique: None,
        region: None,
        artisan_background: None,
    });

    Ok(ContentAnalysis {
        generated_description,
        story,
        suggested_tags: suggest_tags(&format!("{} {}", description, category)),
        craft_techniques: techniques_for(category),
        cultural_context,
        marketing_keywords: MARKETING_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        target_audience: TARGET_AUDIENCES.iter().map(|s| s.to_string()).collect(),
        price_range: price_range_for(category),
    })
}

/// Multi-paragraph heritage narrative with per-field substitutions.
pub fn generate_story(input: &StoryInput<'_>) -> String {
    let region = input.region.filter(|s| !s.is_empty()).unwrap_or("India");
    let materials = input
        .materials
        .filter(|s| !s.is_empty())
        .unwrap_or("traditional materials");
    let technique = input
        .technique
        .filter(|s| !s.is_empty())
        .unwrap_or("traditional craftsmanship");
    let category = input
        .category
        .filter(|s| !s.is_empty())
        .unwrap_or("craftsmanship");

    let background = match input.artisan_background.filter(|s| !s.is_empty()) {
        Some(bg) => format!(
            "The artisan's journey began {}, learning from masters who themselves \
             learned from their predecessors.",
            bg
        ),
        None => "This craft has been passed down through generations, with each \
                 artisan adding their own touch while preserving the essence of \
                 the tradition."
            .to_string(),
    };

    format!(
        "In the vibrant workshops of {region}, where tradition meets artistry, \
         this {title} comes to life through the skilled hands of master \
         craftspeople.\n\n\
         The creation process begins at dawn, when the artisan carefully selects \
         the finest {materials}, each piece chosen for its unique character and \
         potential. Using the ancient technique of {technique}, every curve and \
         detail is shaped with patience and precision that can only come from \
         years of dedicated practice.\n\n\
         {background}\n\n\
         What makes this {title} truly special is not just its aesthetic beauty, \
         but the story it carries. Each piece is a bridge between the past and \
         present, carrying the soul of traditional {category} into contemporary \
         homes.\n\n\
         When you choose this piece, you're not just purchasing a product; \
         you're becoming part of a legacy, supporting local artisans, and \
         helping preserve invaluable cultural heritage for future generations.",
        region = region,
        title = input.title,
        materials = materials,
        technique = technique,
        background = background,
        category = category,
    )
}

/// Fixed-vocabulary tags matched by substring against the input text.
pub fn suggest_tags(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();

    TAG_VOCABULARY
        .iter()
        .filter(|tag| {
            text_lower.contains(*tag) || text_lower.contains(&tag.replace('-', " "))
        })
        .take(MAX_SUGGESTED_TAGS)
        .map(|tag| tag.to_string())
        .collect()
}

pub fn price_range_for(category: &str) -> PriceRange {
    PRICE_RANGES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, range)| *range)
        .unwrap_or(DEFAULT_PRICE_RANGE)
}

pub fn techniques_for(category: &str) -> Vec<String> {
    CRAFT_TECHNIQUES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, t)| *t)
        .unwrap_or(DEFAULT_TECHNIQUES)
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pottery_price_range() {
        let range = price_range_for("Pottery & Ceramics");
        assert_eq!(range, PriceRange { min: 500, max: 3000 });
    }

    #[test]
    fn per_category_price_table() {
        let expected = [
            ("Pottery & Ceramics", 500, 3000),
            ("Textiles & Fabrics", 800, 5000),
            ("Jewelry & Accessories", 1200, 8000),
            ("Woodwork & Furniture", 2000, 15000),
            ("Metalwork", 1000, 6000),
            ("Leather Goods", 800, 4000),
            ("Art & Paintings", 1500, 10000),
            ("Sculptures", 2000, 12000),
        ];

        assert_eq!(PRICE_RANGES.len(), expected.len());
        for (category, min, max) in expected {
            assert_eq!(
                price_range_for(category),
                PriceRange { min, max },
                "range for {}",
                category
            );
        }
    }

    #[test]
    fn unknown_category_falls_back_to_default() {
        assert_eq!(price_range_for("Spaceship Parts"), DEFAULT_PRICE_RANGE);
        assert_eq!(DEFAULT_PRICE_RANGE, PriceRange { min: 500, max: 5000 });
    }

    #[test]
    fn tags_come_from_the_fixed_vocabulary() {
        let tags = suggest_tags("A handmade, eco-friendly gift with rustic charm");
        assert!(tags.contains(&"handmade".to_string()));
        assert!(tags.contains(&"eco-friendly".to_string()));
        assert!(tags.contains(&"gift".to_string()));
        assert!(tags.contains(&"rustic".to_string()));
        assert!(tags.len() <= 8);
        for tag in &tags {
            assert!(TAG_VOCABULARY.contains(&tag.as_str()));
        }
    }

    #[test]
    fn analyze_requires_some_input() {
        assert!(analyze("", "").is_err());
        assert!(analyze("a clay bowl", "").is_ok());
        assert!(analyze("", "Pottery & Ceramics").is_ok());
    }

    #[test]
    fn analyze_embeds_the_original_description() {
        let analysis = analyze("A hand-thrown terracotta bowl.", "Pottery & Ceramics").unwrap();
        assert!(analysis
            .generated_description
            .contains("A hand-thrown terracotta bowl."));
        assert_eq!(analysis.price_range, PriceRange { min: 500, max: 3000 });
        assert_eq!(analysis.craft_techniques[0], "wheel throwing");
    }

    #[test]
    fn analyze_is_deterministic() {
        let a = analyze("brass lamp", "Metalwork").unwrap();
        let b = analyze("brass lamp", "Metalwork").unwrap();
        assert_eq!(a.generated_description, b.generated_description);
        assert_eq!(a.suggested_tags, b.suggested_tags);
    }

    #[test]
    fn story_substitutes_fields_and_defaults() {
        let story = generate_story(&StoryInput {
            title: "Banarasi Saree",
            category: Some("Textiles & Fabrics"),
            materials: Some("pure silk"),
            technique: Some("brocade weaving"),
            region: Some("Varanasi"),
            artisan_background: None,
        });
        assert!(story.contains("Banarasi Saree"));
        assert!(story.contains("Varanasi"));
        assert!(story.contains("pure silk"));
        assert!(story.contains("brocade weaving"));
        assert!(story.contains("passed down through generations"));

        let bare = generate_story(&StoryInput {
            title: "Clay Pot",
            category: None,
            materials: None,
            technique: None,
            region: None,
            artisan_background: None,
        });
        assert!(bare.contains("India"));
        assert!(bare.contains("traditional materials"));
    }
}
