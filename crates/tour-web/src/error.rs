#![forbid(unsafe_code)]

//! Failures reported by the DOM backend.

/// DOM backend error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    /// A root element injected by id does not exist.
    #[error("element #{0} not found")]
    MissingRoot(String),
    #[error("element #{0} is not an HTML element")]
    NotHtml(String),
    /// A control was bound while no bubble was mounted.
    #[error("no tour bubble mounted")]
    NotMounted,
    /// The mounted bubble has no element for this control.
    #[error("tour bubble has no control '{0}'")]
    MissingControl(String),
    /// A DOM call threw.
    #[error("javascript error: {0}")]
    Js(String),
}

impl DomError {
    /// Whether the error comes from host markup rather than a runtime failure.
    pub fn is_host_setup(&self) -> bool {
        matches!(
            self,
            Self::NoWindow | Self::NoDocument | Self::MissingRoot(_) | Self::NotHtml(_)
        )
    }
}
