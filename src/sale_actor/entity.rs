use crate::actor_framework::Entity;
use crate::domain::{Sale, SaleCreate, SaleStatus};

impl Entity for Sale {
    type Id = String;
    type CreatePayload = SaleCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String { &self.id }

    /// Records a sale. Stock has already been reserved by the caller, so the
    /// sale starts out completed.
    ///
    /// # Errors
    /// Rejects a sale without lines or with a zero-quantity line.
    fn from_create(id: String, payload: SaleCreate) -> Result<Self, String> {
        if payload.lines.is_empty() {
            return Err("A sale needs at least one line".to_string());
        }
        if let Some(line) = payload.lines.iter().find(|line| line.quantity == 0) {
            return Err(format!("Zero quantity for {}", line.product_id));
        }
        Ok(Self {
            id,
            lines: payload.lines,
            total: payload.total,
            status: SaleStatus::Completed,
        })
    }

    /// Sales are immutable once recorded.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err(format!("Sale {} cannot be modified", self.id))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SaleLine;

    #[test]
    fn test_from_create_validates_lines() {
        let line = SaleLine { product_id: "p1".into(), name: "Pan".into(), quantity: 2, unit_price: 1.0 };
        let sale = Sale::from_create("sale_1".into(), SaleCreate { lines: vec![line.clone()], total: 2.0 }).unwrap();
        assert_eq!(sale.status, SaleStatus::Completed);

        assert!(Sale::from_create("sale_2".into(), SaleCreate { lines: vec![], total: 0.0 }).is_err());

        let zero = SaleLine { quantity: 0, ..line };
        assert!(Sale::from_create("sale_3".into(), SaleCreate { lines: vec![zero], total: 0.0 }).is_err());
    }
}
