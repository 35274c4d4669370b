//! Where the dashboard reads snapshots from.

use std::future::Future;
use std::sync::Arc;

use infopanel_adapter_upstream::HttpStatusProvider;
use infopanel_app::ports::StatusProvider;
use infopanel_app::store::StatusStore;
use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::StatusSnapshot;

/// Either this process's own store or another instance's `/api/status`.
pub enum StatusFeed {
    Local(Arc<StatusStore>),
    Remote(HttpStatusProvider),
}

impl StatusProvider for StatusFeed {
    fn status(&self) -> impl Future<Output = Result<StatusSnapshot, InfoPanelError>> + Send {
        async move {
            match self {
                Self::Local(store) => store.status().await,
                Self::Remote(remote) => remote.status().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use infopanel_domain::status::ElectricityData;

    use super::*;

    #[tokio::test]
    async fn should_read_local_store() {
        let store = Arc::new(StatusStore::new());
        store.update_electricity(ElectricityData {
            current_price: Some(7.5),
            ..ElectricityData::default()
        });
        let feed = StatusFeed::Local(Arc::clone(&store));

        let snapshot = feed.status().await.unwrap();

        assert_eq!(snapshot.electricity.current_price, Some(7.5));
    }
}
