//! Checkout module.
//!
//! Order bodies posted to the backend, the order it returns, and the draft
//! builder that validates customer input.

mod draft;
mod order;

pub use draft::{CustomerDetails, OrderDraft};
pub use order::{
    CreateMultiProductOrder, CreateOrder, CreateOrderProductItem, CreateSingleProductOrder, Order,
    OrderPayload, OrderStatus,
};
