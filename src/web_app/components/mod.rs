// web_app/components/mod.rs - UI components module
//
// Structure:
// - common.rs: Reusable atomic components (Button, Modal, Loading, etc.)
// - product.rs: Product table, rows and the create/edit modal
// - filter.rs: Filter bar (quick search and ranges)
// - session.rs: Login/register widget

pub mod common;
pub mod filter;
pub mod product;
pub mod session;

pub use common::*;
pub use filter::*;
pub use product::*;
pub use session::*;
