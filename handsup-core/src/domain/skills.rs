use std::collections::BTreeSet;

/// Trim every skill, drop blanks and collapse duplicates.
///
/// Comparison is case-sensitive: `"First Aid"` and `"first aid"` are distinct
/// skills.
pub fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .filter_map(|skill| {
            let trimmed = skill.as_ref().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_skills;

    #[test]
    fn trims_and_collapses_duplicates() {
        let skills =
            normalize_skills(["  cooking", "cooking ", "", "   ", "Driving"]);
        assert_eq!(
            skills.into_iter().collect::<Vec<_>>(),
            vec!["Driving".to_string(), "cooking".to_string()]
        );
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let skills = normalize_skills(["First Aid", "first aid"]);
        assert_eq!(skills.len(), 2);
    }
}
