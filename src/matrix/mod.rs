pub mod cell;
pub mod normalize;

pub use cell::{Cell, LossyInteger, HOLE_PLACEHOLDER, MAX_EXACT_INTEGER};
pub use normalize::{is_rectangular, max_row_len, Normalizer, Padding};
