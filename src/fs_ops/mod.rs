//! Filesystem operations: collision resolution, relocation and the
//! cross-device copy fallback.

mod atomic;
mod copy;
pub mod duplicate;
pub(crate) mod helpers;
mod io_copy;
mod meta;
mod plan;
mod relocate;
mod space;
pub(crate) mod util;

pub use copy::copy_then_remove;
pub use duplicate::{Reservations, resolve, resolve_with};
pub use helpers::describe_io_error;
pub use plan::{PlannedRelocation, plan};
pub use relocate::{RelocateOptions, desired_path, relocate, relocate_with, strip_name};
