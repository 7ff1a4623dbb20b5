//! Order email rendering with Handlebars.
//!
//! `{{ }}` expressions are HTML-escaped, so customer-supplied names and item
//! descriptions cannot inject markup.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;

use crate::domain::payment::{format_major_units, LineItem, NormalizedOrderSummary};
use crate::ports::EmailError;

const BUSINESS_TEMPLATE: &str = "order_business";
const CUSTOMER_TEMPLATE: &str = "order_customer";

/// Subject and HTML body of a rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Serialize)]
struct ItemView {
    name: String,
    quantity: Option<u32>,
    price: Option<String>,
}

impl From<&LineItem> for ItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("Item")
                .to_string(),
            quantity: item.quantity,
            price: item.price.map(format_major_units),
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderEmailContext<'a> {
    store_name: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
    amount: &'a str,
    currency: &'a str,
    payment_id: &'a str,
    payment_method: &'a str,
    order_date: String,
    items: Vec<ItemView>,
}

/// The two order email templates.
pub struct OrderEmailTemplates {
    registry: Handlebars<'static>,
    store_name: String,
}

impl OrderEmailTemplates {
    pub fn new(store_name: impl Into<String>) -> Result<Self, EmailError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(
                BUSINESS_TEMPLATE,
                include_str!("../../../templates/order_business.html.hbs"),
            )
            .map_err(|e| EmailError::Render(e.to_string()))?;
        registry
            .register_template_string(
                CUSTOMER_TEMPLATE,
                include_str!("../../../templates/order_customer.html.hbs"),
            )
            .map_err(|e| EmailError::Render(e.to_string()))?;

        Ok(Self {
            registry,
            store_name: store_name.into(),
        })
    }

    /// Notice sent to the store.
    pub fn render_business(
        &self,
        summary: &NormalizedOrderSummary,
        items: &[LineItem],
        at: DateTime<Utc>,
    ) -> Result<RenderedEmail, EmailError> {
        let html = self.render(BUSINESS_TEMPLATE, summary, items, at)?;
        Ok(RenderedEmail {
            subject: format!(
                "New Order: {} - ${} ({})",
                summary.customer_name, summary.amount, summary.payment_method
            ),
            html,
        })
    }

    /// Receipt sent to the customer.
    pub fn render_customer(
        &self,
        summary: &NormalizedOrderSummary,
        items: &[LineItem],
        at: DateTime<Utc>,
    ) -> Result<RenderedEmail, EmailError> {
        let html = self.render(CUSTOMER_TEMPLATE, summary, items, at)?;
        Ok(RenderedEmail {
            subject: format!("Order Confirmation - {}", self.store_name),
            html,
        })
    }

    fn render(
        &self,
        template: &str,
        summary: &NormalizedOrderSummary,
        items: &[LineItem],
        at: DateTime<Utc>,
    ) -> Result<String, EmailError> {
        let context = OrderEmailContext {
            store_name: &self.store_name,
            customer_name: &summary.customer_name,
            customer_email: &summary.customer_email,
            amount: &summary.amount,
            currency: &summary.currency,
            payment_id: &summary.payment_id,
            payment_method: &summary.payment_method,
            order_date: at.format("%B %-d, %Y %H:%M UTC").to_string(),
            items: items.iter().map(ItemView::from).collect(),
        };

        self.registry
            .render(template, &context)
            .map_err(|e| EmailError::Render(e.to_string()))
    }
}
