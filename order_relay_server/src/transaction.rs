//! Flattens a validated order payload into the [`TransactionRecord`] the accounting API expects.

use accounting_client::TransactionRecord;
use chrono::{Datelike, Local};

use crate::order::{OrderPayload, Product};

impl From<OrderPayload> for TransactionRecord {
    /// The mapping is purely textual. There is deliberately no arithmetic check that
    /// `quantity × price == amount`; mismatches in the provider data are passed through as-is.
    /// The date is stamped from the server clock at mapping time, since nothing in the payload
    /// carries a trusted timestamp.
    fn from(order: OrderPayload) -> Self {
        let payment = order.payment.unwrap_or_default();
        let products = payment.products.unwrap_or_default();
        Self {
            total: payment.amount.unwrap_or_default(),
            date: local_date_stamp(),
            email: order.ma_email.unwrap_or_default(),
            id: payment.orderid.unwrap_or_default(),
            items: products.iter().map(product_line).collect(),
        }
    }
}

/// The current local date as `day.month.year`, without zero padding.
fn local_date_stamp() -> String {
    let today = Local::now();
    format!("{}.{}.{}", today.day(), today.month(), today.year())
}

/// One item line, `"<name><options> – <quantity>x<price>=<amount>;"`, where `<options>` is
/// `" (<opt>: <variant>, …)"` when the product has options and empty otherwise.
fn product_line(product: &Product) -> String {
    let options = match product.options.as_deref() {
        Some(opts) if !opts.is_empty() => {
            let opts = opts.iter().map(|o| format!("{}: {}", o.option, o.variant)).collect::<Vec<_>>().join(", ");
            format!(" ({opts})")
        },
        _ => String::new(),
    };
    format!(
        "{}{options} – {}x{}={};",
        product.name.as_deref().unwrap_or_default(),
        product.quantity.unwrap_or_default(),
        product.price.unwrap_or_default(),
        product.amount.unwrap_or_default()
    )
}

#[cfg(test)]
mod test {
    use accounting_client::TransactionRecord;

    use crate::order::OrderPayload;

    fn payload(json: &str) -> OrderPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn item_lines_are_deterministic_and_order_preserving() {
        let order = payload(
            r#"{
                "payment": {
                    "amount": 11,
                    "orderid": "A1",
                    "products": [
                        {"name": "A", "quantity": 2, "price": 3, "amount": 6},
                        {"name": "B", "quantity": 1, "price": 5, "amount": 5,
                         "options": [{"option": "Color", "variant": "Red"}]}
                    ]
                }
            }"#,
        );
        let record = TransactionRecord::from(order);
        assert_eq!(record.items, "A – 2x3=6;B (Color: Red) – 1x5=5;");
    }

    #[test]
    fn multiple_options_are_comma_separated() {
        let order = payload(
            r#"{"payment": {"products": [
                {"name": "Shirt", "quantity": 1, "price": 20, "amount": 20,
                 "options": [{"option": "Size", "variant": "M"}, {"option": "Color", "variant": "Blue"}]}
            ]}}"#,
        );
        let record = TransactionRecord::from(order);
        assert_eq!(record.items, "Shirt (Size: M, Color: Blue) – 1x20=20;");
    }

    #[test]
    fn fractional_amounts_keep_their_decimals() {
        let order = payload(
            r#"{"payment": {"products": [{"name": "Bag", "quantity": 2, "price": 14.95, "amount": 29.9}]}}"#,
        );
        let record = TransactionRecord::from(order);
        assert_eq!(record.items, "Bag – 2x14.95=29.9;");
    }

    #[test]
    fn mismatched_amounts_are_passed_through_unchecked() {
        let order = payload(r#"{"payment": {"products": [{"name": "X", "quantity": 2, "price": 3, "amount": 99}]}}"#);
        let record = TransactionRecord::from(order);
        assert_eq!(record.items, "X – 2x3=99;");
    }

    #[test]
    fn scalar_fields_are_copied_with_defaults() {
        let order = payload(r#"{"payment": {"amount": 59.9, "orderid": "ORD-1"}, "ma_email": "j@example.com"}"#);
        let record = TransactionRecord::from(order);
        assert_eq!(record.total, 59.9);
        assert_eq!(record.id, "ORD-1");
        assert_eq!(record.email, "j@example.com");
        assert_eq!(record.items, "");

        let empty = TransactionRecord::from(payload("{}"));
        assert_eq!(empty.total, 0.0);
        assert!(empty.id.is_empty());
        assert!(empty.email.is_empty());
    }

    #[test]
    fn date_is_stamped_from_the_local_clock() {
        use chrono::{Datelike, Local};
        let record = TransactionRecord::from(payload("{}"));
        let parts = record.date.split('.').map(|p| p.parse::<i32>().unwrap()).collect::<Vec<_>>();
        assert_eq!(parts.len(), 3);
        let (day, month, year) = (parts[0], parts[1], parts[2]);
        assert!((1..=31).contains(&day));
        assert!((1..=12).contains(&month));
        assert_eq!(year, Local::now().year());
    }
}
