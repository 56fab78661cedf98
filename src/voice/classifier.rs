//! Classifies a normalized transcript into a cart command.
//!
//! The rules form a priority list: the first rule whose pattern matches and
//! whose extractor yields a command wins. Several phrasings would match more
//! than one intent ("quitar todo" is both a removal and a clear), so the order
//! of [`RULES`] is part of the contract.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::normalize::normalize;

/// How much of a product a removal takes out of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveQuantity {
    /// No quantity was spoken: the whole line goes.
    All,
    Units(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum ParsedCommand {
    AddItem { fragment: String, quantity: u32 },
    RemoveItem { fragment: String, quantity: RemoveQuantity },
    SetQuantity { fragment: String, quantity: u32 },
    ClearCart,
    Checkout,
    /// Carries the normalized transcript for feedback.
    Unrecognized { transcript: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Checkout,
    ClearCart,
    AddItem,
    RemoveItem,
    SetQuantity,
    Unrecognized,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::Checkout => "checkout",
            Intent::ClearCart => "clear_cart",
            Intent::AddItem => "add_item",
            Intent::RemoveItem => "remove_item",
            Intent::SetQuantity => "set_quantity",
            Intent::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

impl ParsedCommand {
    pub fn intent(&self) -> Intent {
        match self {
            ParsedCommand::AddItem { .. } => Intent::AddItem,
            ParsedCommand::RemoveItem { .. } => Intent::RemoveItem,
            ParsedCommand::SetQuantity { .. } => Intent::SetQuantity,
            ParsedCommand::ClearCart => Intent::ClearCart,
            ParsedCommand::Checkout => Intent::Checkout,
            ParsedCommand::Unrecognized { .. } => Intent::Unrecognized,
        }
    }
}

// =============================================================================
// Vocabulary (already accent-free, since patterns run on normalized text)
// =============================================================================

const ADD_VERBS: &str = "agregar|agregame|agrega|agregue|anadir|anademe|anade|ponme|poner|pon|meteme|meter|mete|quiero|dame|deme|necesito|sumar|suma|incluir|incluye|llevar|llevo";
const REMOVE_VERBS: &str = "quitar|quitame|quita|quite|eliminar|eliminame|elimina|sacar|sacame|saca|remover|remueve|borrar|borra|retirar|retira|descontar|descuenta";
const SET_VERBS: &str = "cambiar|cambia|actualizar|actualiza|modificar|modifica|ajustar|ajusta|establecer|establece|fijar|fija|dejar|deja";
const QUANTITY: &str = r"[0-9]+|uno|una|un|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez";

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("un", 1),
    ("uno", 1),
    ("una", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
];

const LEADING_FILLER: &[&str] = &[
    "el", "la", "los", "las", "unos", "unas", "de", "del", "cantidad", "unidad", "unidades", "pieza", "piezas",
];

const TRAILING_FILLER: &[&str] = &[
    "por favor",
    "porfa",
    "al carrito",
    "del carrito",
    "en el carrito",
    "al carro",
    "del carro",
    "a la canasta",
    "de la canasta",
];

/// Parses a quantity token. Digits parse directly and saturate at `u32::MAX`,
/// so an absurd count still hits the stock check instead of shrinking.
/// "uno".."diez" map to 1..10; any other word counts as 1.
pub fn parse_quantity(token: &str) -> u32 {
    let token = token.trim();
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        // All ASCII digits, so the only possible failure is overflow
        return token.parse().unwrap_or(u32::MAX);
    }
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, value)| *value)
        .unwrap_or(1)
}

fn is_quantity_word(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit()) || NUMBER_WORDS.iter().any(|(word, _)| *word == token)
}

/// Strips articles and filler around a product-name fragment. `None` when
/// nothing that could name a product is left.
fn clean_fragment(raw: &str) -> Option<String> {
    let mut fragment = raw.trim().to_string();
    loop {
        let before = fragment.len();
        for filler in TRAILING_FILLER {
            if let Some(stripped) = fragment.strip_suffix(filler) {
                if stripped.is_empty() || stripped.ends_with(' ') {
                    fragment = stripped.trim_end().to_string();
                }
            }
        }
        if fragment.len() == before {
            break;
        }
    }

    let words: Vec<&str> = fragment
        .split_whitespace()
        .skip_while(|word| LEADING_FILLER.contains(word))
        .collect();
    if words.is_empty() || (words.len() == 1 && is_quantity_word(words[0])) {
        return None;
    }
    Some(words.join(" "))
}

// =============================================================================
// Rule table
// =============================================================================

type Extractor = fn(&Captures<'_>) -> Option<ParsedCommand>;

struct CommandRule {
    intent: Intent,
    pattern: Regex,
    extract: Extractor,
}

impl CommandRule {
    fn new(intent: Intent, pattern: &str, extract: Extractor) -> Self {
        Self {
            intent,
            pattern: Regex::new(pattern).expect("command patterns are valid"),
            extract,
        }
    }
}

fn capture<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map(|m| m.as_str()).unwrap_or("")
}

fn extract_checkout(_: &Captures<'_>) -> Option<ParsedCommand> {
    Some(ParsedCommand::Checkout)
}

fn extract_clear(_: &Captures<'_>) -> Option<ParsedCommand> {
    Some(ParsedCommand::ClearCart)
}

fn extract_add(caps: &Captures<'_>) -> Option<ParsedCommand> {
    let quantity = caps.name("qty").map(|m| parse_quantity(m.as_str())).unwrap_or(1);
    Some(ParsedCommand::AddItem {
        fragment: clean_fragment(capture(caps, "item"))?,
        quantity,
    })
}

fn extract_remove(caps: &Captures<'_>) -> Option<ParsedCommand> {
    let quantity = match caps.name("qty") {
        Some(m) => RemoveQuantity::Units(parse_quantity(m.as_str())),
        None => RemoveQuantity::All,
    };
    Some(ParsedCommand::RemoveItem {
        fragment: clean_fragment(capture(caps, "item"))?,
        quantity,
    })
}

fn extract_set(caps: &Captures<'_>) -> Option<ParsedCommand> {
    Some(ParsedCommand::SetQuantity {
        fragment: clean_fragment(capture(caps, "item"))?,
        quantity: parse_quantity(capture(caps, "qty")),
    })
}

static RULES: Lazy<Vec<CommandRule>> = Lazy::new(|| {
    vec![
        CommandRule::new(
            Intent::Checkout,
            r"\b(?:finalizar|finaliza|completar|completa|terminar|termina|procesar|procesa|cerrar|cierra|confirmar|confirma)\s+(?:(?:la|el|mi|esta|este)\s+)?(?:venta|compra|pedido|orden|carrito)\b|\b(?:pagar|paga|cobrar|cobra)\b",
            extract_checkout,
        ),
        CommandRule::new(
            Intent::ClearCart,
            r"\b(?:vaciar|vacia|limpiar|limpia|borrar|borra|eliminar|elimina|quitar|quita)\s+(?:(?:todo|todos)\s+)?(?:(?:el|la|los|las|mi)\s+)?(?:carrito|carro|todo|productos|canasta|cesta)\b",
            extract_clear,
        ),
        CommandRule::new(
            Intent::AddItem,
            &format!(r"\b(?:{ADD_VERBS})\s+(?P<qty>{QUANTITY})\s+(?P<item>.+)$"),
            extract_add,
        ),
        CommandRule::new(
            Intent::AddItem,
            &format!(r"\b(?:{ADD_VERBS})\s+(?P<item>.+)$"),
            extract_add,
        ),
        CommandRule::new(
            Intent::RemoveItem,
            &format!(r"\b(?:{REMOVE_VERBS})\s+(?P<qty>{QUANTITY})\s+(?P<item>.+)$"),
            extract_remove,
        ),
        CommandRule::new(
            Intent::RemoveItem,
            &format!(r"\b(?:{REMOVE_VERBS})\s+(?P<item>.+)$"),
            extract_remove,
        ),
        CommandRule::new(
            Intent::SetQuantity,
            &format!(
                r"\b(?:{SET_VERBS})\s+(?P<item>.+?)\s+(?:a|en)\s+(?P<qty>{QUANTITY})(?:\s+(?:unidades|unidad|piezas|pieza))?(?:\s+por favor)?$"
            ),
            extract_set,
        ),
    ]
});

/// Classifies a raw transcript. Pure: same normalized text, same command.
pub fn classify(transcript: &str) -> ParsedCommand {
    let text = normalize(transcript);
    RULES
        .iter()
        .find_map(|rule| {
            let caps = rule.pattern.captures(&text)?;
            let command = (rule.extract)(&caps)?;
            tracing::trace!(intent = %rule.intent, "Rule matched");
            Some(command)
        })
        .unwrap_or(ParsedCommand::Unrecognized { transcript: text })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(fragment: &str, quantity: u32) -> ParsedCommand {
        ParsedCommand::AddItem { fragment: fragment.into(), quantity }
    }

    fn remove(fragment: &str, quantity: RemoveQuantity) -> ParsedCommand {
        ParsedCommand::RemoveItem { fragment: fragment.into(), quantity }
    }

    fn set(fragment: &str, quantity: u32) -> ParsedCommand {
        ParsedCommand::SetQuantity { fragment: fragment.into(), quantity }
    }

    #[test]
    fn test_add_with_and_without_quantity() {
        assert_eq!(classify("agregar dos manzanas"), add("manzanas", 2));
        assert_eq!(classify("Añade 3 leches al carrito"), add("leches", 3));
        assert_eq!(classify("agregar una manzana"), add("manzana", 1));
        assert_eq!(classify("quiero pan integral"), add("pan integral", 1));
        assert_eq!(classify("dame diez huevos por favor"), add("huevos", 10));
        assert_eq!(classify("ponme dos unidades de leche"), add("leche", 2));
    }

    #[test]
    fn test_remove_with_and_without_quantity() {
        assert_eq!(classify("quitar manzana"), remove("manzana", RemoveQuantity::All));
        assert_eq!(classify("quitar dos manzanas"), remove("manzanas", RemoveQuantity::Units(2)));
        assert_eq!(classify("saca 1 leche del carrito"), remove("leche", RemoveQuantity::Units(1)));
        assert_eq!(classify("elimina el queso"), remove("queso", RemoveQuantity::All));
    }

    #[test]
    fn test_set_quantity() {
        assert_eq!(classify("cambiar leche a 5"), set("leche", 5));
        assert_eq!(classify("Cambia la cantidad de leche a cinco"), set("leche", 5));
        assert_eq!(classify("deja el pan en 2 unidades"), set("pan", 2));
        assert_eq!(classify("actualiza arroz a 0"), set("arroz", 0));
    }

    #[test]
    fn test_clear_and_checkout_take_priority() {
        assert_eq!(classify("vaciar carrito"), ParsedCommand::ClearCart);
        assert_eq!(classify("quitar todo"), ParsedCommand::ClearCart);
        assert_eq!(classify("eliminar todos los productos"), ParsedCommand::ClearCart);
        assert_eq!(classify("finalizar compra"), ParsedCommand::Checkout);
        assert_eq!(classify("Procesar la venta"), ParsedCommand::Checkout);
        // "pagar" wins over the add verb "quiero"
        assert_eq!(classify("quiero pagar"), ParsedCommand::Checkout);
        assert_eq!(classify("Cobra por favor"), ParsedCommand::Checkout);
        assert_eq!(classify("paga"), ParsedCommand::Checkout);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(
            classify("Blablabla"),
            ParsedCommand::Unrecognized { transcript: "blablabla".into() }
        );
        assert_eq!(classify("agregar"), ParsedCommand::Unrecognized { transcript: "agregar".into() });
        assert_eq!(classify("agregar el"), ParsedCommand::Unrecognized { transcript: "agregar el".into() });
        assert_eq!(classify("agregar dos"), ParsedCommand::Unrecognized { transcript: "agregar dos".into() });
        assert_eq!(classify("   "), ParsedCommand::Unrecognized { transcript: String::new() });
    }

    #[test]
    fn test_accent_and_case_variants_classify_identically() {
        let variants = [
            ("AÑADIR DOS PLÁTANOS", "añadir dos platanos"),
            ("Cambiar Café a 3", "cambiar cafe a 3"),
            ("Quitar Jamón", "quitar jamon"),
            ("¿Qué es esto?", "que es esto"),
        ];
        for (a, b) in variants {
            assert_eq!(classify(a), classify(b), "{a} vs {b}");
        }
    }

    #[test]
    fn test_oversized_and_non_ascii_counts() {
        assert_eq!(classify("agregar 99999999999 manzanas"), add("manzanas", u32::MAX));
        assert_eq!(
            classify("quitar 5000000000 manzanas"),
            remove("manzanas", RemoveQuantity::Units(u32::MAX))
        );
        // Only ASCII digits count as a spoken quantity
        assert!(!matches!(classify("agregar \u{0663} manzanas"), ParsedCommand::AddItem { quantity: 3, .. }));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("7"), 7);
        assert_eq!(parse_quantity("siete"), 7);
        assert_eq!(parse_quantity("una"), 1);
        assert_eq!(parse_quantity("diez"), 10);
        assert_eq!(parse_quantity("muchos"), 1);
        assert_eq!(parse_quantity("99999999999"), u32::MAX);
        assert_eq!(parse_quantity("4294967296"), u32::MAX);
        assert_eq!(parse_quantity("007"), 7);
    }
}
