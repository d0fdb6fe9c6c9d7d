use serde::{Deserialize, Serialize};

/// Category entity - a section of the site articles are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Sections the site ships with: `(name, slug, description)`.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 3] = [
    (
        "Intelligence Artificielle",
        "ia",
        "IA, machine learning et technologies émergentes",
    ),
    ("Mobile", "mobile", "Smartphones, tablettes et applications"),
    (
        "Tech & Gadgets",
        "tech",
        "Hardware, logiciels, innovations et voitures électriques",
    ),
];
