//! Canned company advisory notes.
//!
//! Presentation content only; nothing here feeds the numeric score.

use crate::processing::profiles::{CompanyProfile, ProfileCategory};

const GENERIC_NOTES: [&str; 3] = [
    "Tailor your resume to the specific job description",
    "Use standard section headings such as Experience, Education and Skills",
    "Quantify achievements with concrete metrics",
];

/// Notes for a profile: its own notes when defined, otherwise the category notes.
pub fn company_notes(profile: &CompanyProfile) -> Vec<String> {
    if !profile.notes.is_empty() {
        return profile.notes.clone();
    }
    category_notes(profile.category)
        .iter()
        .map(|note| note.to_string())
        .collect()
}

fn category_notes(category: ProfileCategory) -> &'static [&'static str] {
    match category {
        ProfileCategory::BigTech => &[
            "Quantify the scale and impact of the systems you built",
            "Highlight system design and cloud platform experience",
        ],
        ProfileCategory::ItServices => &[
            "Emphasize domain expertise and client interaction",
            "Include project delivery experience",
        ],
        ProfileCategory::Consulting => &[
            "Show client-facing impact and engagement outcomes",
            "Highlight transformation and strategy work",
        ],
        ProfileCategory::Finance => &[
            "Emphasize accuracy, risk awareness and regulatory exposure",
            "Quantify the financial or operational impact of your work",
        ],
        ProfileCategory::General => &GENERIC_NOTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::profiles::ProfileStore;

    #[test]
    fn test_profile_notes_take_precedence() {
        let store = ProfileStore::builtin();
        let notes = company_notes(store.get_profile("Amazon"));
        assert_eq!(notes[0], "Emphasize leadership principles and customer impact");
    }

    #[test]
    fn test_category_notes() {
        let store = ProfileStore::builtin();
        let notes = company_notes(store.get_profile("Wipro"));
        assert_eq!(notes, vec!["Emphasize domain expertise and client interaction", "Include project delivery experience"]);
    }

    #[test]
    fn test_unknown_company_gets_three_generic_notes() {
        let store = ProfileStore::builtin();
        let notes = company_notes(store.get_profile("Unheard Of Ltd"));
        assert_eq!(notes.len(), 3);
    }
}
