pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_pagination, draw_status};
pub use header::draw_header;
pub use utils::{single_line, tag_color, truncate};
