use order_notifier_core::model::{Order, Purchase};
use tera::{Context, Tera};

const NEW_ORDER_TEMPLATE: &str = "new-order.html";

/// Renders the notification body for one purchase of an order.
///
/// The template is embedded at compile time.
#[derive(Clone, Debug)]
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// # Errors
    ///
    /// Returns an error if the embedded template does not parse.
    pub fn new() -> Result<Self, tera::Error> {
        let mut engine = Tera::default();
        engine.add_raw_template(
            NEW_ORDER_TEMPLATE,
            include_str!("../../../templates/new-order.html"),
        )?;

        Ok(Self { engine })
    }

    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&self, order: &Order, purchase: &Purchase) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("order", order);
        context.insert("customer", &order.customer);
        context.insert("purchase", purchase);

        self.engine.render(NEW_ORDER_TEMPLATE, &context)
    }
}

/// Subject line of the notification for `purchase`.
#[must_use]
pub fn subject_for(purchase: &Purchase) -> String {
    format!("New Order: {}", purchase.purchase_type)
}
