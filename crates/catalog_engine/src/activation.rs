use std::sync::Mutex;

use catalog_core::ActivationId;
use tokio_util::sync::CancellationToken;

/// One fetch cycle: its sequence number and the token that fires once a newer
/// cycle starts.
#[derive(Debug, Clone)]
pub struct Activation {
    pub id: ActivationId,
    pub token: CancellationToken,
}

#[derive(Debug, Default)]
struct Latest {
    id: ActivationId,
    token: Option<CancellationToken>,
}

/// Hands out activations; starting one cancels the previous.
///
/// Ids only move forward: an activation older than the newest one seen is
/// refused, so a call that starts late can never supersede a newer one.
#[derive(Debug, Default)]
pub struct Activations {
    latest: Mutex<Latest>,
}

impl Activations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the next activation after the newest one seen.
    pub fn begin(&self) -> Activation {
        let mut latest = self.lock();
        let id = latest.id.next();
        Self::replace(&mut latest, id)
    }

    /// Starts activation `id` issued elsewhere. `None` when a newer id has
    /// already been seen. Re-beginning the current id restarts it.
    pub fn begin_at(&self, id: ActivationId) -> Option<Activation> {
        let mut latest = self.lock();
        if id < latest.id {
            return None;
        }
        Some(Self::replace(&mut latest, id))
    }

    pub fn is_current(&self, id: ActivationId) -> bool {
        self.lock().id == id
    }

    pub fn latest(&self) -> ActivationId {
        self.lock().id
    }

    fn replace(latest: &mut Latest, id: ActivationId) -> Activation {
        let token = CancellationToken::new();
        if let Some(previous) = latest.token.replace(token.clone()) {
            previous.cancel();
        }
        latest.id = id;
        Activation { id, token }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Latest> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
