//! Email sign-in / sign-up form.

mod render;
mod state;
mod update;

pub use render::*;
pub use state::*;
pub use update::*;
