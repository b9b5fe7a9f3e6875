use cs_core::ports::ForegroundAppPort;

/// Used where the desktop offers no portable way to ask for the focused
/// window; excluded-app filtering is then inactive.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownForegroundApp;

impl ForegroundAppPort for UnknownForegroundApp {
    fn focused_app_id(&self) -> Option<String> {
        None
    }
}
