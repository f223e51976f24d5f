mod form;
mod lifecycle;
mod registry;

pub use form::reduce_form;
pub use lifecycle::reduce_lifecycle;
pub use registry::reduce_registry;
