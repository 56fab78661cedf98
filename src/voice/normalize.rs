//! Transcript normalization shared by the classifier and the resolver.
//!
//! Everything is matched on the normalized form, so "Canción", "CANCION" and
//! "cancion" are the same text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lower-cases, strips diacritics through canonical decomposition, turns
/// punctuation into spaces and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-delimited tokens of the normalized text.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_string).collect()
}

struct SuffixRule {
    suffix: &'static str,
    replacement: &'static str,
    /// The rule applies only to words longer than this many characters.
    longer_than: usize,
}

// First match wins.
const SINGULAR_RULES: &[SuffixRule] = &[
    SuffixRule { suffix: "ces", replacement: "z", longer_than: 3 },
    SuffixRule { suffix: "les", replacement: "l", longer_than: 3 },
    SuffixRule { suffix: "res", replacement: "r", longer_than: 3 },
    SuffixRule { suffix: "nes", replacement: "n", longer_than: 3 },
    SuffixRule { suffix: "es", replacement: "", longer_than: 3 },
    SuffixRule { suffix: "s", replacement: "", longer_than: 2 },
];

/// Approximate Spanish singular of a single normalized token.
pub fn singularize(token: &str) -> String {
    let len = token.chars().count();
    for rule in SINGULAR_RULES {
        if len <= rule.longer_than {
            continue;
        }
        if let Some(stem) = token.strip_suffix(rule.suffix) {
            return format!("{}{}", stem, rule.replacement);
        }
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize("Canción"), "cancion");
        assert_eq!(normalize("  AÑADIR   dos   Plátanos, por favor! "), "anadir dos platanos por favor");
        assert_eq!(normalize("¿Vaciar el carrito?"), "vaciar el carrito");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tokens() {
        assert_eq!(tokens("Leche  Entera"), vec!["leche", "entera"]);
    }

    #[test]
    fn test_singularize_rules() {
        assert_eq!(singularize("lapices"), "lapiz");
        assert_eq!(singularize("panes"), "pan");
        assert_eq!(singularize("papeles"), "papel");
        assert_eq!(singularize("flores"), "flor");
        assert_eq!(singularize("leches"), "lech");
        assert_eq!(singularize("manzanas"), "manzana");
        assert_eq!(singularize("huevos"), "huevo");
        assert_eq!(singularize("ces"), "ce");
        // Too short for any rule
        assert_eq!(singularize("es"), "es");
        assert_eq!(singularize("as"), "as");
        assert_eq!(singularize("leche"), "leche");
    }
}
