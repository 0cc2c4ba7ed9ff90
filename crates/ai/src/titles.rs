//! Canned title suggestions, keyed by category.
//!
//! These are the deterministic floor for `suggest_titles`: served whenever
//! the generative service is unavailable, with `personal` as the default
//! category and the fallback for unknown ones.

/// Category key for medical memoirs.
pub const CATEGORY_MEDICAL: &str = "medical";

/// Category key for business writing.
pub const CATEGORY_BUSINESS: &str = "business";

/// Category key for personal stories; the default.
pub const CATEGORY_PERSONAL: &str = "personal";

const MEDICAL_TITLES: &[&str] = &[
    "Healing Wisdom: A Medical Professional's Journey",
    "Life Lessons from the Clinic",
    "The Art of Caring: Medical Insights",
];

const BUSINESS_TITLES: &[&str] = &[
    "Entrepreneurial Wisdom: Lessons Learned",
    "Building Success: A Business Journey",
    "The Path to Leadership",
];

const PERSONAL_TITLES: &[&str] = &[
    "Life Lessons Shared",
    "Wisdom from Experience",
    "My Journey: Stories and Insights",
];

/// Canned suggestions for a category. Unknown categories (and `None`)
/// fall back to `personal`.
pub fn fallback_suggestions(category: Option<&str>) -> Vec<String> {
    let titles = match category {
        Some(CATEGORY_MEDICAL) => MEDICAL_TITLES,
        Some(CATEGORY_BUSINESS) => BUSINESS_TITLES,
        _ => PERSONAL_TITLES,
    };
    titles.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_get_their_own_list() {
        let medical = fallback_suggestions(Some(CATEGORY_MEDICAL));
        assert_eq!(medical.len(), 3);
        assert!(medical[0].contains("Medical"));

        let business = fallback_suggestions(Some(CATEGORY_BUSINESS));
        assert_eq!(business.len(), 3);
        assert!(business[1].contains("Business"));
    }

    #[test]
    fn unknown_category_falls_back_to_personal() {
        assert_eq!(
            fallback_suggestions(Some("astrology")),
            fallback_suggestions(Some(CATEGORY_PERSONAL))
        );
    }

    #[test]
    fn missing_category_falls_back_to_personal() {
        assert_eq!(
            fallback_suggestions(None),
            fallback_suggestions(Some(CATEGORY_PERSONAL))
        );
    }

    #[test]
    fn always_exactly_three_suggestions() {
        for category in [None, Some("medical"), Some("business"), Some("x")] {
            assert_eq!(fallback_suggestions(category).len(), 3);
        }
    }
}
