// Export modules for use in tests
pub mod app;
pub mod event_source;
pub mod panic_handler;
pub mod raster;
pub mod settings;
pub mod view;
pub mod viewer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main app components
pub use app::{App, AppAction, run_app_with_event_source};
pub use raster::{PixelFormat, RasterImage, ViewerError};
pub use view::ImageView;
