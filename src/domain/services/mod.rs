//! Pure domain services.

pub mod window_calculator;

pub use window_calculator::{
    compute_window, display_indices, next_index, previous_index, wrap_index,
};
