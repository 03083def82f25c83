//! URL slug generation.
//!
//! Tour pages are addressed by a slug derived from the tour name. The slug is
//! regenerated whenever the name changes, so it is never stored out of sync.

/// Convert a display name into a URL slug.
///
/// - Lowercases ASCII letters.
/// - Runs of anything that is not ASCII alphanumeric collapse into one `-`.
/// - Leading and trailing separators are dropped.
///
/// # Examples
///
/// ```
/// use trailhead_core::text::slugify;
///
/// assert_eq!(slugify("The Forest Hiker"), "the-forest-hiker");
/// assert_eq!(slugify("Sea & Sun: 7 Days!"), "sea-sun-7-days");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(slugify("The Snow Adventurer"), "the-snow-adventurer");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("Hike -- & Camp"), "hike-camp");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  Hello  "), "hello");
        assert_eq!(slugify("!wow!"), "wow");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("7 Day Trek"), "7-day-trek");
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn non_ascii_treated_as_separator() {
        assert_eq!(slugify("Café Tour"), "caf-tour");
    }
}
