pub mod filters;
pub mod select;
pub mod validate;

pub use filters::{apply_filters, FilterRule};
pub use select::{select_string, strip_fields, SelectMeta, SelectMode};
pub use validate::{extract_valid_fields, validate_add, validate_update, FieldSpec, Validation};
