use serde::{Deserialize, Serialize};

/// The raw order-notification payload POSTed by the form provider.
///
/// Every field is optional and unknown fields are ignored. Providers add fields without notice,
/// and a relay has no business rejecting data it does not read. Validation therefore only rejects
/// values that are present but out of range or mis-shaped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Diagnostic probe marker. The literal value `"test"` marks the delivery as a probe.
    pub test: Option<String>,
    pub payment: Option<Payment>,
    pub ma_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Option<f64>,
    pub orderid: Option<String>,
    pub products: Option<Vec<Product>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub options: Option<Vec<ProductOption>>,
}

/// A named product customization, e.g. `Color: Red`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductOption {
    pub option: String,
    pub variant: String,
}

/// A validated delivery, tagged once as either a diagnostic probe or a real order.
#[derive(Debug, Clone)]
pub enum WebhookRequest {
    Probe,
    Order(OrderPayload),
}

impl OrderPayload {
    /// Check every range and shape constraint, reporting all violations rather than only the
    /// first. Values are taken exactly as deserialized; nothing is clamped or coerced.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        if let Some(products) = self.payment.as_ref().and_then(|p| p.products.as_ref()) {
            if products.is_empty() {
                violations.push("payment.products must contain at least one product".to_string());
            }
            for (i, product) in products.iter().enumerate() {
                if product.quantity.is_some_and(|q| q < 1.0) {
                    violations.push(format!("payment.products[{i}].quantity must be at least 1"));
                }
                if product.price.is_some_and(|p| p < 0.0) {
                    violations.push(format!("payment.products[{i}].price must not be negative"));
                }
                if product.amount.is_some_and(|a| a < 0.0) {
                    violations.push(format!("payment.products[{i}].amount must not be negative"));
                }
            }
        }
        if let Some(email) = self.ma_email.as_deref() {
            if !is_email_shaped(email) {
                violations.push("ma_email must be an email address".to_string());
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Decide once, immediately after validation, whether this delivery is a connectivity probe
    /// or a real order. Only the exact literal `"test"` marks a probe; any other value in the
    /// `test` field is ignored.
    pub fn classify(self) -> WebhookRequest {
        if self.test.as_deref() == Some("test") {
            WebhookRequest::Probe
        } else {
            WebhookRequest::Order(self)
        }
    }

    pub fn product_count(&self) -> usize {
        self.payment.as_ref().and_then(|p| p.products.as_ref()).map(Vec::len).unwrap_or_default()
    }
}

fn is_email_shaped(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_provider_payload() {
        let order = include_str!("./test_assets/order.json");
        let order: OrderPayload = serde_json::from_str(order).unwrap();
        assert!(order.test.is_none());
        assert_eq!(order.ma_email.as_deref(), Some("jane.doe@example.com"));
        let payment = order.payment.as_ref().unwrap();
        assert_eq!(payment.orderid.as_deref(), Some("ORD-2024-000123"));
        assert_eq!(payment.amount, Some(59.9));
        let products = payment.products.as_ref().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].options.as_ref().unwrap()[0].variant, "Matte black");
        assert!(order.validate().is_ok());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let order: OrderPayload =
            serde_json::from_str(r#"{"payment":{"orderid":"1"},"shop":"x","signature":"y","hmac":42}"#).unwrap();
        assert_eq!(order.payment.unwrap().orderid.as_deref(), Some("1"));
    }

    #[test]
    fn empty_payload_is_valid() {
        let order: OrderPayload = serde_json::from_str("{}").unwrap();
        assert!(order.validate().is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let order: OrderPayload = serde_json::from_str(
            r#"{
                "payment": {
                    "amount": 10,
                    "orderid": "A1",
                    "products": [
                        {"name": "Widget", "quantity": -2, "price": -1, "amount": 2},
                        {"name": "Gadget", "quantity": 1, "price": 1, "amount": -1}
                    ]
                },
                "ma_email": "not-an-email"
            }"#,
        )
        .unwrap();
        let violations = order.validate().unwrap_err();
        assert_eq!(violations.len(), 4);
        assert!(violations[0].contains("products[0].quantity"));
        assert!(violations[1].contains("products[0].price"));
        assert!(violations[2].contains("products[1].amount"));
        assert!(violations[3].contains("ma_email"));
    }

    #[test]
    fn empty_product_list_is_a_violation() {
        let order: OrderPayload = serde_json::from_str(r#"{"payment":{"products":[]}}"#).unwrap();
        let violations = order.validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("at least one product"));
    }

    #[test]
    fn probe_classification_only_matches_the_literal() {
        let probe: OrderPayload = serde_json::from_str(r#"{"test":"test","payment":{"orderid":"1"}}"#).unwrap();
        assert!(matches!(probe.classify(), WebhookRequest::Probe));
        let not_probe: OrderPayload = serde_json::from_str(r#"{"test":"TEST"}"#).unwrap();
        assert!(matches!(not_probe.classify(), WebhookRequest::Order(_)));
        let no_marker: OrderPayload = serde_json::from_str("{}").unwrap();
        assert!(matches!(no_marker.classify(), WebhookRequest::Order(_)));
    }

    #[test]
    fn email_shapes() {
        assert!(is_email_shaped("a@b"));
        assert!(is_email_shaped("jane.doe@example.com"));
        assert!(!is_email_shaped("@example.com"));
        assert!(!is_email_shaped("jane@"));
        assert!(!is_email_shaped("janeexample.com"));
    }
}
