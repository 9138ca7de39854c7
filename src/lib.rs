pub mod contracts;
pub mod form;
pub mod page;
pub mod prelude;
pub mod showcase;
pub mod theme;
pub mod widgets;

pub use form::{FormController, FormError, FormResult};
pub use page::{HomePage, PageError};
