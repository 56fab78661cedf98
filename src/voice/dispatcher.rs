//! Turns a parsed command plus inventory and cart snapshots into a proposed
//! cart change and the feedback line shown to the cashier.
//!
//! Nothing here mutates state. Every branch yields exactly one outcome; only a
//! malformed snapshot is an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Cart, CartChange, CartLine, Product};

use super::classifier::{ParsedCommand, RemoveQuantity};
use super::error::InterpreterError;
use super::resolver::resolve;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Mutation { change: CartChange, message: String },
    /// The caller should run sale finalization; the cart is not touched here.
    Checkout,
    Noop { reason: NoopReason, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoopReason {
    Unrecognized,
    NotFound { suggestion: Option<String> },
    NotInCart,
    InsufficientStock { available: u32 },
    EmptyCart,
    InvalidQuantity,
}

impl Outcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Mutation { message, .. } | Outcome::Noop { message, .. } => Some(message),
            Outcome::Checkout => None,
        }
    }

    pub fn change(&self) -> Option<&CartChange> {
        match self {
            Outcome::Mutation { change, .. } => Some(change),
            _ => None,
        }
    }

    pub fn noop_reason(&self) -> Option<&NoopReason> {
        match self {
            Outcome::Noop { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

const EXAMPLE_PHRASES: &str =
    "\"agregar dos manzanas\", \"quitar leche\", \"cambiar pan a 3\", \"vaciar carrito\" o \"finalizar compra\"";

/// Decides the cart change for `command` against the given snapshots.
///
/// # Errors
/// Returns [`InterpreterError`] only when a snapshot breaks its own invariants.
pub fn dispatch(command: &ParsedCommand, inventory: &[Product], cart: &Cart) -> Result<Outcome, InterpreterError> {
    validate_snapshots(inventory, cart)?;

    let outcome = match command {
        ParsedCommand::AddItem { fragment, quantity } => add_item(fragment, *quantity, inventory, cart),
        ParsedCommand::RemoveItem { fragment, quantity } => remove_item(fragment, *quantity, cart),
        ParsedCommand::SetQuantity { fragment, quantity } => set_quantity(fragment, *quantity, inventory, cart),
        ParsedCommand::ClearCart => clear_cart(cart),
        ParsedCommand::Checkout => Outcome::Checkout,
        ParsedCommand::Unrecognized { transcript } => noop(
            NoopReason::Unrecognized,
            format!("No entendí \"{}\". Prueba con: {}.", transcript, EXAMPLE_PHRASES),
        ),
    };
    Ok(outcome)
}

/// Proposes adding `quantity` units of an already resolved product, keeping
/// the line within available stock. Shared with barcode scans.
pub fn propose_add(product: &Product, quantity: u32, cart: &Cart) -> Outcome {
    if quantity == 0 {
        return invalid_quantity();
    }
    let current = cart.quantity_of(&product.id);
    match current.checked_add(quantity) {
        Some(target) if target <= product.quantity => {
            let message = if quantity == 1 {
                format!("Se agregó 1 {} al carrito.", product.name)
            } else {
                format!("Se agregaron {} {} al carrito.", quantity, product.name)
            };
            Outcome::Mutation {
                change: CartChange::Upsert { product: product.clone(), quantity: target },
                message,
            }
        }
        _ => insufficient_stock(product, current),
    }
}

fn add_item(fragment: &str, quantity: u32, inventory: &[Product], cart: &Cart) -> Outcome {
    let candidates: Vec<&Product> = inventory.iter().collect();
    let result = resolve(fragment, &candidates);
    match result.matched() {
        Some(product) => propose_add(product, quantity, cart),
        None => not_found(fragment, result.suggestion()),
    }
}

fn remove_item(fragment: &str, quantity: RemoveQuantity, cart: &Cart) -> Outcome {
    let lines = cart.sorted_lines();
    let Some(line) = resolve(fragment, &lines).matched() else {
        return not_in_cart(fragment);
    };
    match quantity {
        RemoveQuantity::All => delete_line(&line.product),
        RemoveQuantity::Units(0) => invalid_quantity(),
        RemoveQuantity::Units(units) => {
            let remaining = line.quantity.saturating_sub(units);
            if remaining == 0 {
                return delete_line(&line.product);
            }
            // The line's own product keeps the change within the stock it was added against.
            Outcome::Mutation {
                change: CartChange::Upsert { product: line.product.clone(), quantity: remaining },
                message: format!("Se quitaron {} {} del carrito.", units, line.product.name),
            }
        }
    }
}

fn set_quantity(fragment: &str, quantity: u32, inventory: &[Product], cart: &Cart) -> Outcome {
    let lines = cart.sorted_lines();
    let in_cart: Option<&CartLine> = resolve(fragment, &lines).matched();

    let product = match in_cart {
        Some(line) => inventory
            .iter()
            .find(|p| p.id == line.product.id)
            .unwrap_or(&line.product),
        None => {
            let candidates: Vec<&Product> = inventory.iter().collect();
            let result = resolve(fragment, &candidates);
            match result.matched() {
                Some(product) => product,
                None => return not_found(fragment, result.suggestion()),
            }
        }
    };

    if quantity == 0 {
        return match in_cart {
            Some(_) => delete_line(product),
            None => not_in_cart(fragment),
        };
    }
    if quantity > product.quantity {
        return insufficient_stock(product, cart.quantity_of(&product.id));
    }
    Outcome::Mutation {
        change: CartChange::Upsert { product: product.clone(), quantity },
        message: format!("Se actualizó {} a {} {}.", product.name, quantity, units(quantity)),
    }
}

fn clear_cart(cart: &Cart) -> Outcome {
    if cart.is_empty() {
        return noop(NoopReason::EmptyCart, "El carrito ya está vacío.".to_string());
    }
    Outcome::Mutation {
        change: CartChange::Clear,
        message: format!("Se vació el carrito ({} {}).", cart.len(), if cart.len() == 1 { "producto" } else { "productos" }),
    }
}

fn validate_snapshots(inventory: &[Product], cart: &Cart) -> Result<(), InterpreterError> {
    let mut seen = HashSet::new();
    for product in inventory {
        if !seen.insert(product.id.as_str()) {
            return Err(InterpreterError::DuplicateProduct(product.id.clone()));
        }
    }
    for (key, line) in &cart.lines {
        if *key != line.product.id {
            return Err(InterpreterError::MalformedCart {
                key: key.clone(),
                reason: format!("line holds product {}", line.product.id),
            });
        }
        if line.quantity == 0 {
            return Err(InterpreterError::MalformedCart {
                key: key.clone(),
                reason: "zero-quantity line".to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Feedback
// =============================================================================

fn units(n: u32) -> &'static str {
    if n == 1 { "unidad" } else { "unidades" }
}

fn noop(reason: NoopReason, message: String) -> Outcome {
    Outcome::Noop { reason, message }
}

fn delete_line(product: &Product) -> Outcome {
    Outcome::Mutation {
        change: CartChange::Delete { product_id: product.id.clone() },
        message: format!("Se eliminó {} del carrito.", product.name),
    }
}

fn not_found(fragment: &str, suggestion: Option<&Product>) -> Outcome {
    let mut message = format!("No se encontró \"{}\" en el inventario.", fragment);
    if let Some(product) = suggestion {
        message.push_str(&format!(" ¿Quisiste decir {}?", product.name));
    }
    noop(
        NoopReason::NotFound { suggestion: suggestion.map(|p| p.name.clone()) },
        message,
    )
}

fn not_in_cart(fragment: &str) -> Outcome {
    noop(NoopReason::NotInCart, format!("No se encontró \"{}\" en el carrito.", fragment))
}

fn insufficient_stock(product: &Product, in_cart: u32) -> Outcome {
    let mut message = format!(
        "Stock insuficiente. Solo hay {} {} disponibles de {}.",
        product.quantity,
        units(product.quantity),
        product.name
    );
    if in_cart > 0 {
        message.push_str(&format!(" Ya tienes {} en el carrito.", in_cart));
    }
    noop(NoopReason::InsufficientStock { available: product.quantity }, message)
}

fn invalid_quantity() -> Outcome {
    noop(NoopReason::InvalidQuantity, "La cantidad debe ser mayor a cero.".to_string())
}
