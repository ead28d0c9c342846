mod error_map;
mod field_store;
mod submission;

pub use error_map::{ErrorMap, ValidationErrors};
pub use field_store::{FieldStore, FieldValues, UnknownFieldError};
pub use submission::{
    Settlement, SubmissionId, SubmissionLifecycle, SubmissionRequest, SubmissionStatus,
};
