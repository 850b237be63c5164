use crate::config::Config;
use cadence::{BufferedUdpMetricSink, Counted, CountedExt, QueuingMetricSink, StatsdClient, Timed};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::time::Instant;

// Thin wrapper so call sites never deal with the cadence builder API
pub struct StatsdClientWrapper {
    client: Arc<StatsdClient>,
    use_tags: bool,
}

impl Clone for StatsdClientWrapper {
    fn clone(&self) -> Self {
        Self { client: self.client.clone(), use_tags: self.use_tags }
    }
}

impl StatsdClientWrapper {
    pub fn new(client: StatsdClient, use_tags: bool) -> Self {
        tracing::info!("Created StatsdClient wrapper with use_tags={}", use_tags);
        Self { client: Arc::new(client), use_tags }
    }

    pub fn incr(&self, key: &str) {
        if self.use_tags {
            self.client.incr_with_tags(key).send();
            tracing::trace!("Sent tagged metric: {}", key);
        } else {
            match self.client.incr(key) {
                Ok(_) => tracing::trace!("Sent metric: {}", key),
                Err(e) => tracing::warn!("Failed to send metric {}: {}", key, e),
            }
        }
    }

    pub fn count(&self, key: &str, value: u64) {
        if self.use_tags {
            self.client.count_with_tags(key, value as i64).send();
        } else if let Err(e) = self.client.count(key, value as i64) {
            tracing::warn!("Failed to send metric {}: {}", key, e);
        }
    }

    pub fn time(&self, key: &str, value: u64) {
        if self.use_tags {
            self.client.time_with_tags(key, value).send();
            tracing::trace!("Sent tagged metric: {} = {}ms", key, value);
        } else {
            match self.client.time(key, value) {
                Ok(_) => tracing::trace!("Sent metric: {} = {}ms", key, value),
                Err(e) => tracing::warn!("Failed to send metric {}: {}", key, e),
            }
        }
    }
}

static METRICS_CLIENT: OnceCell<Option<StatsdClientWrapper>> = OnceCell::new();

/// Initialize the StatsD client once per process
pub fn setup_metrics(config: &Config) {
    METRICS_CLIENT.get_or_init(|| {
        tracing::info!("Metrics configuration: enabled={}", config.statsd.enabled);

        if !config.statsd.enabled {
            return None;
        }

        let addr = config.statsd.addr.as_str();
        let prefix = config.statsd.prefix.as_str();

        match create_statsd_client(addr, prefix) {
            Ok(client) => {
                tracing::info!(
                    "StatsD metrics initialized with endpoint {} and prefix '{}'",
                    addr,
                    prefix
                );
                let wrapper = StatsdClientWrapper::new(client, config.statsd.use_tags);
                wrapper.incr("metrics.initialization");
                Some(wrapper)
            },
            Err(e) => {
                tracing::error!("Failed to create StatsD client: {}", e);
                None
            },
        }
    });
}

fn create_statsd_client(
    addr: &str,
    prefix: &str,
) -> Result<StatsdClient, Box<dyn std::error::Error + Send + Sync>> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
    socket.set_nonblocking(true)?;

    let udp_sink = BufferedUdpMetricSink::from(addr, socket)?;
    let queuing_sink = QueuingMetricSink::from(udp_sink);

    Ok(StatsdClient::from_sink(prefix, queuing_sink))
}

fn get_client() -> Option<&'static StatsdClientWrapper> {
    METRICS_CLIENT.get().and_then(|client_opt| client_opt.as_ref())
}

/// Terminal state of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Invalid,
    Error,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Invalid => "invalid",
            Outcome::Error => "error",
        }
    }
}

/// Count a finished request as `request.<operation>.<outcome>`
pub fn record_request(operation: &str, outcome: Outcome) {
    if let Some(client) = get_client() {
        client.incr(&format!("request.{}.{}", operation, outcome.as_str()));
    }
}

/// Count results handed back by the reader
pub fn record_result_size(operation: &str, size: usize) {
    if let Some(client) = get_client() {
        client.count(&format!("reader.{}.results", operation), size as u64);
    }
}

// Sends elapsed milliseconds on drop
pub struct MetricsTimer {
    start: Instant,
    metric_name: String,
}

impl MetricsTimer {
    pub fn new(metric_name: impl Into<String>) -> Self {
        Self { start: Instant::now(), metric_name: metric_name.into() }
    }
}

impl Drop for MetricsTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        if let Some(client) = get_client() {
            client.time(&self.metric_name, duration.as_millis() as u64);
        }
    }
}
