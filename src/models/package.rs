use serde::Serialize;

/// A sellable hub package ("Daily Pass", "Hourly", ...).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub duration: f64, // ⇔ packages.duration (hours, 0 for variable)
    pub is_hourly: bool,
}

impl Package {
    pub fn new(name: &str, price: i64, duration: f64, is_hourly: bool) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            price,
            duration,
            is_hourly,
        }
    }

    /// Price label as shown in pickers: "₱49/hr" or "₱299".
    pub fn price_label(&self, symbol: &str) -> String {
        let amount = crate::utils::formatting::money(self.price, symbol);
        if self.is_hourly {
            format!("{amount}/hr")
        } else {
            amount
        }
    }
}
