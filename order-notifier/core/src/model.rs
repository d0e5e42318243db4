//! Request and order types shared by the web layer and the services.

use serde::{Deserialize, Serialize};
use snafu::ensure;
use utoipa::{IntoParams, ToSchema};

use crate::error::{self, Error, Result};

/// Customization label whose value is the appraised property's address.
pub const SUBJECT_PROPERTY_ADDRESS_LABEL: &str = "Subject Property Address";

/// Raw query of `GET /newOrder`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NewOrderParams {
    /// Human-facing order number, e.g. `1042`.
    #[param(example = "1042")]
    pub order_id: Option<String>,

    /// Email address the customer checked out with.
    #[param(example = "customer@example.com")]
    pub customer_email_address: Option<String>,
}

/// A validated new-order notification request.
///
/// Both fields are guaranteed to be non-blank; their content is kept verbatim
/// because order matching is an exact string comparison.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewOrderRequest {
    order_number: String,
    customer_email: String,
}

impl NewOrderRequest {
    /// # Errors
    ///
    /// Returns `Error::MissingParameter` if either value is blank.
    pub fn new<N, E>(order_number: N, customer_email: E) -> Result<Self>
    where
        N: Into<String>,
        E: Into<String>,
    {
        let order_number = order_number.into();
        let customer_email = customer_email.into();

        ensure!(!order_number.trim().is_empty(), error::MissingParameterSnafu { name: "orderId" });
        ensure!(
            !customer_email.trim().is_empty(),
            error::MissingParameterSnafu { name: "customerEmailAddress" }
        );

        Ok(Self { order_number, customer_email })
    }

    #[inline]
    #[must_use]
    pub fn order_number(&self) -> &str { &self.order_number }

    #[inline]
    #[must_use]
    pub fn customer_email(&self) -> &str { &self.customer_email }
}

impl TryFrom<NewOrderParams> for NewOrderRequest {
    type Error = Error;

    fn try_from(
        NewOrderParams { order_id, customer_email_address }: NewOrderParams,
    ) -> Result<Self> {
        let order_number = order_id.ok_or(Error::MissingParameter { name: "orderId" })?;
        let customer_email = customer_email_address
            .ok_or(Error::MissingParameter { name: "customerEmailAddress" })?;

        Self::new(order_number, customer_email)
    }
}

/// An order resolved from the order platform.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Platform-assigned identifier, the dedup key.
    pub id: String,

    pub order_number: String,

    pub customer: Customer,

    /// Line items in the order they were purchased.
    pub purchases: Vec<Purchase>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// One line item of an order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    /// Product SKU, the routing key.
    pub sku: String,

    /// Product display name.
    pub purchase_type: String,

    /// Empty when the line item carries no subject property address.
    pub subject_address: String,

    /// ISO currency code of `paid_value`.
    pub currency: String,

    /// Unit price paid as reported upstream, e.g. `450.00`. Empty when absent.
    pub paid_value: String,
}
