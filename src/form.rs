mod controller;
mod handle;

pub use controller::{FormController, FormSnapshot};
pub use handle::{FormHandle, SubmitOutcome};
