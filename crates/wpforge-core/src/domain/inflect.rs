//! String case conversion used by the derivation passes.
//!
//! | Function           | "my-cool site" | "Acme Site"  |
//! |--------------------|----------------|--------------|
//! | `title_case`       | "My Cool Site" | "Acme Site"  |
//! | `kebab_case`       | "my-cool-site" | "acme-site"  |
//! | `snake_case`       | "my_cool_site" | "acme_site"  |
//! | `upper_snake_case` | "MY_COOL_SITE" | "ACME_SITE"  |

/// Title-case every word and join with single spaces.
pub fn title_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase words joined with `-`. Used for slugs and directory names.
pub fn kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Lowercase words joined with `_`. Used for PHP function prefixes.
pub fn snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Uppercase words joined with `_`. Used for PHP class names and namespaces.
pub fn upper_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lowercase words.
///
/// ## Word Boundary Detection
///
/// 1. **Separators:** `_`, `-`, `.`, whitespace and any other punctuation end a word
/// 2. **camelCase:** `aB` splits between `a` and `B`
/// 3. **Acronyms:** `HTTPServer` splits between `P` and `S`
///    (detected by the `Upper Upper Lower` pattern)
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_slug() {
        assert_eq!(title_case("my-cool-site"), "My Cool Site");
        assert_eq!(title_case("my_cool_site"), "My Cool Site");
    }

    #[test]
    fn kebab_from_title() {
        assert_eq!(kebab_case("Acme Site"), "acme-site");
        assert_eq!(kebab_case("  Acme   Site  "), "acme-site");
        assert_eq!(kebab_case("Acme's Site!"), "acme-s-site");
    }

    #[test]
    fn snake_and_upper_snake() {
        assert_eq!(snake_case("Acme Site"), "acme_site");
        assert_eq!(upper_snake_case("Acme Site"), "ACME_SITE");
        assert_eq!(upper_snake_case("foo-bar baz"), "FOO_BAR_BAZ");
    }

    #[test]
    fn camel_and_acronym_boundaries() {
        assert_eq!(kebab_case("myCoolSite"), "my-cool-site");
        assert_eq!(kebab_case("HTTPServer"), "http-server");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(title_case(""), "");
        assert_eq!(kebab_case("---"), "");
        assert_eq!(upper_snake_case(""), "");
    }

    #[test]
    fn title_case_is_stable() {
        let once = title_case("my-cool-site");
        assert_eq!(title_case(&once), once);
    }
}
