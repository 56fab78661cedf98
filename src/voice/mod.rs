//! Voice cart-command interpreter.
//!
//! Takes a speech transcript plus read-only inventory and cart snapshots and
//! returns the cart change to apply along with the feedback text. Applying the
//! change, persisting it and running checkout belong to the caller.

pub mod classifier;
pub mod dispatcher;
pub mod error;
pub mod normalize;
pub mod resolver;

pub use classifier::{classify, parse_quantity, Intent, ParsedCommand, RemoveQuantity};
pub use dispatcher::{dispatch, propose_add, NoopReason, Outcome};
pub use error::InterpreterError;
pub use resolver::{resolve, MatchResult, MatchTier, Named};

use tracing::{debug, instrument};

use crate::domain::{Cart, Product};

/// Classifies `transcript` and dispatches it against the snapshots.
#[instrument(skip(inventory, cart), fields(products = inventory.len(), lines = cart.len()))]
pub fn interpret(transcript: &str, inventory: &[Product], cart: &Cart) -> Result<Outcome, InterpreterError> {
    let command = classify(transcript);
    debug!(intent = %command.intent(), ?command, "Transcript classified");
    let outcome = dispatch(&command, inventory, cart)?;
    debug!(?outcome, "Outcome proposed");
    Ok(outcome)
}
