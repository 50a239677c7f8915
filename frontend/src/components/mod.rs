pub mod about_modal;
pub mod handlers;
pub mod header;
pub mod layout;
pub mod model_selector;
pub mod notifications;
pub mod progress_panel;
pub mod results;
pub mod statistics;
pub mod theme_toggle;
pub mod upload_section;
pub mod utils;
