//! Slug generation
//!
//! Turns human-readable titles into URL-safe identifiers. Uniqueness is
//! enforced by the owning service, which probes its repository and appends
//! an incrementing numeric suffix (`titulo`, `titulo-1`, `titulo-2`, ...)
//! until the slug is free.

/// Generate a URL-friendly slug from a title or name.
///
/// Lowercases ASCII, maps separators and ASCII punctuation to hyphens,
/// collapses hyphen runs and trims them from both ends. Non-ASCII
/// characters (accented Portuguese letters included) are kept as-is.
pub fn slugify(text: &str) -> String {
    let slug: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if !c.is_ascii() {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut result = String::new();
    let mut prev_hyphen = false;

    for c in slug.chars() {
        if c == '-' {
            if !prev_hyphen && !result.is_empty() {
                result.push(c);
                prev_hyphen = true;
            }
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    result.trim_end_matches('-').to_string()
}

/// Build the nth candidate for a base slug: the base itself for 0, then
/// `base-1`, `base-2`, ...
pub fn candidate(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Semana   da - Consciência"), "semana-da-consciência");
    }

    #[test]
    fn test_slugify_keeps_accents() {
        assert_eq!(slugify("Educação"), "educação");
    }

    #[test]
    fn test_slugify_trims_hyphens() {
        assert_eq!(slugify("  evento  "), "evento");
        assert_eq!(slugify("--evento--"), "evento");
    }

    #[test]
    fn test_candidate_sequence() {
        assert_eq!(candidate("evento", 0), "evento");
        assert_eq!(candidate("evento", 1), "evento-1");
        assert_eq!(candidate("evento", 2), "evento-2");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Slugs never contain uppercase ASCII, spaces, or hyphen runs.
        #[test]
        fn slugify_output_is_normalized(input in ".{0,60}") {
            let slug = slugify(&input);

            prop_assert!(!slug.contains(' '));
            prop_assert!(!slug.contains("--"));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.chars().any(|c| c.is_ascii_uppercase()));
        }

        /// Slugifying is idempotent.
        #[test]
        fn slugify_is_idempotent(input in ".{0,60}") {
            let once = slugify(&input);
            prop_assert_eq!(slugify(&once), once.clone());
        }

        /// Distinct suffix counters always yield distinct candidates.
        #[test]
        fn candidates_are_distinct(n in 0u32..1000, m in 0u32..1000) {
            prop_assume!(n != m);
            prop_assert_ne!(candidate("base", n), candidate("base", m));
        }
    }
}
