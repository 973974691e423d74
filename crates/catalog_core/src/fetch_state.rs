/// Tri-state result handed to presentation.
///
/// `Failed` is terminal for the cycle and carries the value presentation should
/// fall back to (all-zero stats, empty listing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Failed {
        reason: String,
        fallback: T,
    },
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn failed(reason: impl Into<String>, fallback: T) -> Self {
        Self::Failed {
            reason: reason.into(),
            fallback,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Data to render: the ready value or the failure fallback. `None` while loading.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loading => None,
            Self::Failed { fallback, .. } => Some(fallback),
            Self::Ready(data) => Some(data),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
