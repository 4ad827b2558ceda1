mod header;
mod status;

pub use header::render_header;
pub use status::{StatusView, render_status};
