use app::Application;
use replay_camera::config::CONFIG_NAME;

/// Headless replay viewer.
///
/// Marker type defining the application's identity for [`app::AppBuilder`].
pub struct ReplayViewer;

impl Application for ReplayViewer {
    const APP_ID: &'static str = "replay_viewer";
    const CONFIG_NAME: &'static str = CONFIG_NAME;
}
