/// Transient status feedback for the submit and reveal flows.
///
/// Mirrors the banner a demo page flashes while a call is in flight:
/// it holds the most recent message and nothing else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusBanner {
    #[default]
    Idle,
    Pending(String),
    Success(String),
    Failed(String),
}

impl StatusBanner {
    pub fn pending(msg: impl Into<String>) -> Self {
        Self::Pending(msg.into())
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Whether a call is currently in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The banner's message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending(m) | Self::Success(m) | Self::Failed(m) => Some(m),
        }
    }
}

impl std::fmt::Display for StatusBanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending(m) => write!(f, "pending: {m}"),
            Self::Success(m) => write!(f, "success: {m}"),
            Self::Failed(m) => write!(f, "failed: {m}"),
        }
    }
}
