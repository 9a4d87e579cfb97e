//! Order drafting.
//!
//! [`OrderDraft`] collects customer details and product lines and validates
//! them before producing the body posted to the order endpoint.

use crate::cart::validate_quantity;
use crate::catalog::Product;
use crate::checkout::order::{
    CreateMultiProductOrder, CreateOrderProductItem, CreateSingleProductOrder, OrderPayload,
};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Customer contact and shipping details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub customer_name: String,
    pub district: String,
    pub address: String,
    pub phone_number: String,
}

impl CustomerDetails {
    pub fn new(
        customer_name: impl Into<String>,
        district: impl Into<String>,
        address: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            district: district.into(),
            address: address.into(),
            phone_number: phone_number.into(),
        }
    }

    fn validate(&self) -> Result<(), CommerceError> {
        let fields = [
            ("customer_name", &self.customer_name),
            ("district", &self.district),
            ("address", &self.address),
            ("phone_number", &self.phone_number),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CommerceError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// A product line being drafted.
#[derive(Debug, Clone)]
struct DraftLine {
    product: Product,
    size: String,
    color: String,
    quantity: i64,
}

/// Builder for an order body.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    customer: CustomerDetails,
    lines: Vec<DraftLine>,
    delivery_charge: Money,
}

impl OrderDraft {
    /// Start a draft for `customer` with no delivery charge.
    pub fn new(customer: CustomerDetails) -> Self {
        Self {
            customer,
            lines: Vec::new(),
            delivery_charge: Money::zero(Currency::default()),
        }
    }

    /// Set the delivery charge.
    pub fn with_delivery_charge(mut self, charge: Money) -> Self {
        self.delivery_charge = charge;
        self
    }

    /// Add a line for `product` at its current price.
    pub fn add_line(
        mut self,
        product: Product,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: i64,
    ) -> Self {
        self.lines.push(DraftLine {
            product,
            size: size.into(),
            color: color.into(),
            quantity,
        });
        self
    }

    /// Validate and produce the order body.
    ///
    /// One line yields a single-product body; more yield a multi-product body.
    pub fn build(self) -> Result<OrderPayload, CommerceError> {
        self.customer.validate()?;
        if self.lines.is_empty() {
            return Err(CommerceError::EmptyOrder);
        }

        let mut items = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            items.push(line_item(line)?);
        }
        let currency = self.delivery_charge.currency;
        let product_total = Money::sum(items.iter().map(|i| &i.product_total), currency)?;
        let total_price = product_total.checked_add(&self.delivery_charge)?;
        let CustomerDetails {
            customer_name,
            district,
            address,
            phone_number,
        } = self.customer;

        if items.len() == 1 {
            let product = items.remove(0);
            Ok(OrderPayload::Single(CreateSingleProductOrder {
                customer_name,
                district,
                address,
                phone_number,
                product,
                product_total,
                delivery_charge: self.delivery_charge,
                total_price,
            }))
        } else {
            Ok(OrderPayload::Multi(CreateMultiProductOrder {
                customer_name,
                district,
                address,
                phone_number,
                products: items,
                product_total,
                delivery_charge: self.delivery_charge,
                total_price,
            }))
        }
    }
}

fn line_item(line: &DraftLine) -> Result<CreateOrderProductItem, CommerceError> {
    let quantity = validate_quantity(line.quantity)?;
    if !line.product.is_orderable() {
        return Err(CommerceError::SoldOut(line.product.name.clone()));
    }
    let unit_price = line.product.current_price;
    Ok(CreateOrderProductItem {
        product_id: line.product.id,
        product_name: line.product.name.clone(),
        product_size: line.size.clone(),
        product_color: line.color.clone(),
        product_image: line.product.image.clone(),
        quantity,
        unit_price,
        product_total: unit_price.multiply(quantity),
    })
}
