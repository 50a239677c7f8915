pub mod api;
pub mod image_data;
pub mod intake;
pub mod progress;
pub mod theme;
pub mod workflow;

pub use api::{ClientConfig, HistoryStatistics, ModelsResponse};
pub use image_data::{DecodeError, UpscaledImage};
pub use intake::{IncomingFile, SelectedFile, SelectionId};
pub use theme::Theme;
pub use workflow::{Phase, RunError, RunId, RunTicket, TickHandle, Workflow, WorkflowError};
