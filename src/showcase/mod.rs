//! The showcase form: every widget kind bound to one controller on a single
//! home page.

mod form;
mod page;

pub use form::*;
pub use page::{ShowcaseBindings, build_page, welcome};
