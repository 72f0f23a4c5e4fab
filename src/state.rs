use std::sync::Arc;

use crate::backend::MemberBackend;
use crate::import::registry::ImportRegistry;
use crate::import::runner::ImportOptions;
use crate::notify::Notifier;

/// Shared handles every handler receives through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn MemberBackend>,
    /// `None` when credential notices are switched off.
    pub notifier: Option<Arc<dyn Notifier>>,
    pub runs: ImportRegistry,
    pub import: ImportOptions,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn MemberBackend>,
        notifier: Option<Arc<dyn Notifier>>,
        import: ImportOptions,
    ) -> Self {
        Self {
            backend,
            notifier,
            runs: ImportRegistry::new(),
            import,
        }
    }
}
