use serde::Serialize;

pub const UNCATEGORIZED: &str = "Uncategorized";

const CATEGORY_EMOJI: &[(&str, &str)] = &[
    // spending
    ("food", "🍽️"),
    ("transportation", "🚗"),
    ("entertainment", "🎬"),
    ("utilities", "🔌"),
    ("shopping", "🛍️"),
    ("health", "🏥"),
    ("housing", "🏠"),
    ("travel", "✈️"),
    ("education", "🎓"),
    ("other", "🧾"),
    // earning
    ("salary", "💼"),
    ("freelance", "🧑‍💻"),
    ("investment", "📈"),
    ("gift", "🎁"),
    ("refund", "🔁"),
    ("uncategorized", "🗂️"),
];

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub emoji: &'static str,
}

/// The label an expense is grouped under. Stored case is preserved.
pub fn category_label(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Case-insensitive emoji lookup; unknown labels get the uncategorized icon.
pub fn category_emoji(category: &str) -> &'static str {
    let key = category.trim().to_lowercase();
    CATEGORY_EMOJI
        .iter()
        .find(|(name, _)| *name == key)
        .or_else(|| CATEGORY_EMOJI.iter().find(|(name, _)| *name == "uncategorized"))
        .map(|(_, emoji)| *emoji)
        .unwrap_or("🗂️")
}

pub fn known_categories() -> Vec<CategoryInfo> {
    CATEGORY_EMOJI
        .iter()
        .map(|&(name, emoji)| CategoryInfo { name, emoji })
        .collect()
}
