use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Fraction of a service's original price paid to the therapist.
    pub commission_rate: f64,
    pub shop_name: String,
    pub shop_phone: Option<String>,
    pub shop_address: Option<String>,
}

impl ShopConfig {
    pub fn with_rate(commission_rate: f64) -> Self {
        Self {
            commission_rate,
            shop_name: String::new(),
            shop_phone: None,
            shop_address: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopConfigUpdate {
    pub commission_rate: Option<f64>,
    pub shop_name: Option<String>,
    pub shop_phone: Option<String>,
    pub shop_address: Option<String>,
}
