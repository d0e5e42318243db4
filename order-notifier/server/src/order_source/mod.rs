//! Upstream order listing.

mod error;
mod squarespace;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

pub use self::{error::Error, squarespace::SquarespaceClient};

/// Source of the raw order listing.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetches the current order listing in upstream order.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a
    /// payload that cannot be decoded.
    async fn fetch_orders(&self) -> Result<Vec<UpstreamOrder>, Error>;
}

/// Body of the orders endpoint. Upstream `null` values decode as empty.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OrderListing {
    pub result: Vec<UpstreamOrder>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamOrder {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,

    #[serde_as(as = "DefaultOnNull")]
    pub customer_email: String,

    #[serde_as(as = "DefaultOnNull")]
    pub order_number: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub billing_address: BillingAddress,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub line_items: Vec<LineItem>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub sku: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub product_name: String,

    #[serde(default)]
    pub customizations: Option<Vec<Customization>>,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub unit_price_paid: Money,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Customization {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub label: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub value: String,
}

/// Amount as the orders API reports it, e.g. `{ "currency": "CAD", "value": "450.00" }`.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Money {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub currency: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_order_listing() {
        let listing: OrderListing = serde_json::from_str(
            r#"{
                "result": [{
                    "id": "5f1a",
                    "customerEmail": "a@x.com",
                    "orderNumber": "ORD-1",
                    "billingAddress": {
                        "firstName": "Ada",
                        "lastName": "Lovelace",
                        "address1": "1 Main St",
                        "address2": null,
                        "city": "Edmonton",
                        "state": "AB",
                        "countryCode": "CA",
                        "postalCode": "T5J 0N3",
                        "phone": "780-555-0100"
                    },
                    "lineItems": [
                        {
                            "sku": "SQ5929745",
                            "productName": "Residential Appraisal",
                            "customizations": [
                                { "label": "Subject Property Address", "value": "12 Elm Ave" }
                            ],
                            "unitPricePaid": { "currency": "CAD", "value": "450.00" }
                        },
                        { "sku": "SQ8618609", "productName": "Rural Appraisal", "customizations": null }
                    ]
                }]
            }"#,
        )
        .unwrap();

        let order = &listing.result[0];
        assert_eq!(order.order_number, "ORD-1");
        assert_eq!(order.billing_address.phone.as_deref(), Some("780-555-0100"));
        assert_eq!(order.line_items.len(), 2);
        assert!(order.line_items[1].customizations.is_none());
        assert_eq!(order.line_items[0].unit_price_paid.currency, "CAD");
        assert_eq!(order.line_items[0].unit_price_paid.value, "450.00");
        assert!(order.line_items[1].unit_price_paid.value.is_empty());
    }

    #[test]
    fn test_decode_tolerates_nulls_in_unrelated_orders() {
        let listing: OrderListing = serde_json::from_str(
            r#"{
                "result": [
                    {
                        "id": "gift-1",
                        "customerEmail": null,
                        "orderNumber": "GIFT-1",
                        "billingAddress": null,
                        "lineItems": [
                            {
                                "sku": null,
                                "productName": "Gift Card",
                                "customizations": [{ "label": "To", "value": null }],
                                "unitPricePaid": null
                            }
                        ]
                    },
                    {
                        "id": "5f1a",
                        "customerEmail": "a@x.com",
                        "orderNumber": "ORD-1",
                        "lineItems": null
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(listing.result.len(), 2);
        let gift = &listing.result[0];
        assert!(gift.customer_email.is_empty());
        assert!(gift.line_items[0].sku.is_empty());
        assert!(gift.line_items[0].customizations.as_ref().unwrap()[0].value.is_empty());
        assert_eq!(listing.result[1].order_number, "ORD-1");
        assert!(listing.result[1].line_items.is_empty());
    }

    #[test]
    fn test_decode_rejects_body_without_result() {
        assert!(serde_json::from_str::<OrderListing>(r#"{ "pagination": {} }"#).is_err());
    }

    #[test]
    fn test_decode_rejects_order_without_required_fields() {
        let result = serde_json::from_str::<OrderListing>(r#"{ "result": [{ "id": "1" }] }"#);

        assert!(result.is_err());
    }
}
