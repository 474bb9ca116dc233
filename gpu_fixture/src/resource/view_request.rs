//! Per-view request of a factory call

/// What the caller wants for one view kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewRequest {
    /// Neither the bind capability nor a view
    #[default]
    None,
    /// Bind capability and a view object
    Create,
    /// Bind capability only, no view object is derived
    BindOnly,
}

impl ViewRequest {
    /// Whether the resource must carry the matching bind flag
    pub fn binds(&self) -> bool {
        !matches!(self, ViewRequest::None)
    }

    /// Whether a view object must be derived
    pub fn creates(&self) -> bool {
        matches!(self, ViewRequest::Create)
    }
}

#[cfg(test)]
#[path = "view_request_tests.rs"]
mod tests;
