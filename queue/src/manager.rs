//! The Manager owns an ordered sequence of routes and supervises their
//! poll loops (spec §4.1).

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::{QueueError, QueueErrorKind};
use crate::route::{Route, RouteConfig};

pub struct Manager {
    route_configs: Vec<RouteConfig>,
    retry_timeout: Duration,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    pub fn new() -> Self {
        Self {
            route_configs: Vec::new(),
            retry_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_retry_timeout(mut self, retry_timeout: Duration) -> Self {
        self.retry_timeout = retry_timeout;
        self
    }

    /// Append-only; must be called before `run`.
    pub fn register_route(&mut self, mut config: RouteConfig) {
        config.retry_timeout = self.retry_timeout;
        self.route_configs.push(config);
    }

    pub fn register_routes(&mut self, configs: impl IntoIterator<Item = RouteConfig>) {
        for config in configs {
            self.register_route(config);
        }
    }

    pub fn routes(&self) -> &[RouteConfig] {
        &self.route_configs
    }

    /// Fails immediately with `ErrNoRoute` if no routes are registered.
    /// Configures every route (fail-fast on the first error), then spawns
    /// one supervision task per route and blocks until `cancellation`
    /// fires and every route has drained.
    pub async fn run(self, cancellation: CancellationToken) -> Result<(), QueueError> {
        if self.route_configs.is_empty() {
            return Err(QueueError::new(QueueErrorKind::NoRoute));
        }

        let mut routes = Vec::with_capacity(self.route_configs.len());
        for config in self.route_configs {
            routes.push(Arc::new(Route::configure(config).await?));
        }

        let route_tasks = routes.into_iter().map(|route| {
            let token = cancellation.clone();
            let queue_name = route.queue_name().to_string();
            tokio::spawn(async move {
                route.run(token).await;
                queue_name
            })
        });

        let results = join_all(route_tasks).await;
        for result in results {
            match result {
                Ok(queue_name) => info!("route for queue {queue_name} stopped"),
                Err(err) => error!("route task panicked: {err}"),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::client::{QueueClient, ReceiveRequest, WireMessage};
    use crate::errors::QueueError;

    /// Never actually called in these tests; routes are only registered,
    /// never configured or run.
    struct UnusedQueueClient;

    #[async_trait]
    impl QueueClient for UnusedQueueClient {
        async fn get_queue_url(&self, _queue_name: &str) -> Result<String, QueueError> {
            unimplemented!()
        }

        async fn receive_messages(
            &self,
            _req: ReceiveRequest<'_>,
        ) -> Result<Vec<WireMessage>, QueueError> {
            unimplemented!()
        }

        async fn change_message_visibility(
            &self,
            _queue_url: &str,
            _receipt_handle: &str,
            _timeout_secs: i32,
        ) -> Result<(), QueueError> {
            unimplemented!()
        }

        async fn delete_message(
            &self,
            _queue_url: &str,
            _receipt_handle: &str,
        ) -> Result<(), QueueError> {
            unimplemented!()
        }
    }

    fn config(queue_name: &str) -> RouteConfig {
        RouteConfig::new(Arc::new(UnusedQueueClient), queue_name)
    }

    #[test]
    fn register_route_preserves_insertion_order() {
        let mut manager = Manager::new();
        manager.register_route(config("orders"));
        manager.register_route(config("payments"));
        manager.register_route(config("shipments"));

        let names: Vec<&str> = manager
            .routes()
            .iter()
            .map(|c| c.queue_name.as_str())
            .collect();
        assert_eq!(names, vec!["orders", "payments", "shipments"]);
    }

    #[test]
    fn register_routes_preserves_insertion_order() {
        let mut manager = Manager::new();
        manager.register_route(config("first"));
        manager.register_routes(vec![config("second"), config("third")]);

        let names: Vec<&str> = manager
            .routes()
            .iter()
            .map(|c| c.queue_name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
