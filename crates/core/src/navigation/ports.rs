//! Port interface for application navigation

/// Options passed along with a navigation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
    /// Location to come back to once the target route is done (login).
    pub return_to: Option<String>,
}

impl NavigateOptions {
    /// Navigation that replaces the current history entry.
    pub fn replace() -> Self {
        Self { replace: true, return_to: None }
    }

    /// Attach a return-to location.
    pub fn with_return_to(mut self, location: impl Into<String>) -> Self {
        self.return_to = Some(location.into());
        self
    }
}

/// Moves the user between application routes.
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: &str, options: NavigateOptions);

    /// Location the user is currently on.
    fn current_location(&self) -> String;
}
