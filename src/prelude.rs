//! Imports for syntax extensions.

pub use crate::IntoServerUrl as _;
pub use crate::error::TransportError as _;
pub use crate::http::Transport as _;
pub use crate::model::RestModel as _;
