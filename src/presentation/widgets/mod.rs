mod header_bar;
mod project_card;
mod status_bar;

pub use header_bar::{CarouselStatus, HeaderBar, HeaderBarStyle};
pub use project_card::ProjectCard;
pub use status_bar::{KEY_HINTS, StatusBar, StatusLevel};
