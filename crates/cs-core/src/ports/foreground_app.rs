/// Identifies the application that owns keyboard focus.
pub trait ForegroundAppPort: Send + Sync {
    /// Window class or application id, `None` when unknown.
    fn focused_app_id(&self) -> Option<String>;
}
