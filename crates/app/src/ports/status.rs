//! Status port: where the dashboard refresh loop reads snapshots from.

use std::future::Future;
use std::sync::Arc;

use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::StatusSnapshot;

/// Supplies complete status snapshots.
///
/// The in-process [`StatusStore`](crate::store::StatusStore) implements this
/// directly; a remote `/api/status` endpoint is reached through an adapter.
pub trait StatusProvider: Send + Sync {
    /// Return the latest full snapshot.
    fn status(&self) -> impl Future<Output = Result<StatusSnapshot, InfoPanelError>> + Send;
}

impl<T: StatusProvider> StatusProvider for Arc<T> {
    fn status(&self) -> impl Future<Output = Result<StatusSnapshot, InfoPanelError>> + Send {
        (**self).status()
    }
}
