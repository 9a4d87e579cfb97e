//! Server-side HTML for the storefront pages.
//!
//! Pages are a [`Shell`] (head, header, footer) wrapped around sections
//! rendered from view-models:
//! - homepage sections from [`HomepageDerived`](shopfront_commerce::homepage::HomepageDerived)
//! - the `/products` body from a [`ListingQuery`](shopfront_commerce::listing::ListingQuery)
//! - the `/products/{id}` detail section from a [`Product`](shopfront_commerce::catalog::Product)
//!
//! All text from the backend goes through [`html_escape`].

mod card;
mod context;
mod escape;
mod home;
mod listing;
mod product;
mod shell;
mod tracking;

pub use card::*;
pub use context::*;
pub use escape::*;
pub use home::*;
pub use listing::*;
pub use product::*;
pub use shell::*;
pub use tracking::*;
