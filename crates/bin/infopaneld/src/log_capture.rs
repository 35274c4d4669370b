//! Copies log events into the status store's log ring for `/api/debug/logs`.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use infopanel_app::store::StatusStore;

/// A [`Layer`] that appends each event as one formatted line.
pub struct StoreLogLayer {
    store: Arc<StatusStore>,
}

impl StoreLogLayer {
    pub fn new(store: Arc<StatusStore>) -> Self {
        Self { store }
    }
}

impl<S: Subscriber> Layer<S> for StoreLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let metadata = event.metadata();
        self.store.add_log(format!(
            "{} {}: {}{}",
            metadata.level(),
            metadata.target(),
            line.message,
            line.fields
        ));
    }
}

/// Collects the `message` field and renders the rest as ` key=value`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::prelude::*;

    use super::*;

    #[test]
    fn should_capture_message_and_fields() {
        let store = Arc::new(StatusStore::new());
        let subscriber =
            tracing_subscriber::registry().with(StoreLogLayer::new(Arc::clone(&store)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(source = "FMI", attempts = 2, "error fetching data");
        });

        let logs = store.debug_data().app_logs;
        assert_eq!(logs.len(), 1);
        assert_eq!(
            logs[0].message,
            format!(
                "ERROR {}: error fetching data source=FMI attempts=2",
                module_path!()
            )
        );
    }

    #[test]
    fn should_capture_display_fields_without_quotes() {
        let store = Arc::new(StatusStore::new());
        let subscriber =
            tracing_subscriber::registry().with(StoreLogLayer::new(Arc::clone(&store)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(addr = %"0.0.0.0:8080", "listening");
        });

        let logs = store.debug_data().app_logs;
        assert!(logs[0].message.ends_with("listening addr=0.0.0.0:8080"));
        assert!(logs[0].message.starts_with("INFO "));
    }
}
