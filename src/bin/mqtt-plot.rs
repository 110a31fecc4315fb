//! mqtt-plot - live chart of sensor samples from an MQTT topic.
//!
//! Usage:
//!   mqtt-plot                         # localhost:1883, topic graph/data
//!   mqtt-plot --host 10.0.0.5 -t garden/moisture
//!   mqtt-plot --demo                  # synthetic samples, no broker needed
//!   mqtt-plot --headless -v           # no chart, log samples to stderr

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use clap::Parser;
use tracing::{error, info, warn};

use mqtt_plot::bus::mqtt::MqttHandle;
use mqtt_plot::bus::{DemoSource, MqttSource};
use mqtt_plot::config::{
    Config, DEFAULT_CAPACITY, DEFAULT_HOST, DEFAULT_INTERVAL_MS, DEFAULT_KEEP_ALIVE_SECS,
    DEFAULT_PORT, DEFAULT_TOPIC, default_client_id,
};
use mqtt_plot::ingest::IngestHandler;
use mqtt_plot::logging::{self, LogTarget};
use mqtt_plot::sample::SharedStore;
use mqtt_plot::tui::{App, ViewInfo};

/// Default log file used while the chart owns the terminal.
const DEFAULT_LOG_FILE: &str = "mqtt-plot.log";

/// Live chart of sensor samples published over MQTT.
#[derive(Parser)]
#[command(
    name = "mqtt-plot",
    about = "Live chart of sensor samples from an MQTT topic",
    version
)]
struct Args {
    /// Broker host.
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Broker port.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Topic carrying `YYYY-MM-DD HH:MM:SS,<value>,<flag>` payloads.
    #[arg(short, long, default_value = DEFAULT_TOPIC)]
    topic: String,

    /// Number of samples kept on the chart. Older samples are dropped.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Redraw interval in milliseconds.
    #[arg(short, long = "interval-ms", default_value_t = DEFAULT_INTERVAL_MS)]
    interval_ms: u64,

    /// MQTT client id (default: mqtt-plot-<pid>).
    #[arg(long)]
    client_id: Option<String>,

    /// MQTT keep-alive in seconds.
    #[arg(long, default_value_t = DEFAULT_KEEP_ALIVE_SECS)]
    keep_alive: u64,

    /// Generate samples in-process instead of connecting to a broker.
    #[arg(long)]
    demo: bool,

    /// Run without the chart; ingest and log until Ctrl-C.
    #[arg(long)]
    headless: bool,

    /// Log file used while the chart is shown. Ignored with --headless.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            host: self.host.clone(),
            port: self.port,
            topic: self.topic.clone(),
            capacity: self.capacity,
            interval_ms: self.interval_ms,
            client_id: self.client_id.clone().unwrap_or_else(default_client_id),
            keep_alive_secs: self.keep_alive,
        }
    }
}

/// Running bus source, kept so it can be shut down on exit.
enum Source {
    Mqtt(MqttHandle),
    Demo(Arc<AtomicBool>),
}

impl Source {
    fn stop(self) {
        match self {
            Source::Mqtt(handle) => {
                if let Err(e) = handle.disconnect() {
                    warn!(error = %e, "disconnect failed");
                }
            }
            Source::Demo(stop) => stop.store(true, Ordering::Relaxed),
        }
    }
}

/// Ingests until Ctrl-C, logging buffer growth once per interval.
fn run_headless(store: &SharedStore, config: &Config) {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
        error!(error = %e, "failed to install Ctrl-C handler");
        return;
    }

    let mut last_len = 0;
    while running.load(Ordering::SeqCst) {
        thread::sleep(config.interval());
        let len = store.len();
        if len != last_len {
            info!(buffered = len, capacity = config.capacity, "buffer");
            last_len = len;
        }
    }
}

fn main() {
    let args = Args::parse();
    let config = args.config();

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let log_target = if args.headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(args.log_file.clone())
    };
    if let Err(e) = logging::init(args.verbose, args.quiet, &log_target) {
        eprintln!(
            "Error: cannot open log file '{}': {}",
            args.log_file.display(),
            e
        );
        std::process::exit(1);
    }

    info!("mqtt-plot {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: broker={}, topic={}, capacity={}, interval={}ms",
        config.broker_addr(),
        config.topic,
        config.capacity,
        config.interval_ms
    );

    let store = SharedStore::new(config.capacity);
    let handler = IngestHandler::new(config.topic.clone(), store.clone());
    let stats = handler.stats();

    let (source_label, source) = if args.demo {
        let demo = DemoSource::new(config.interval());
        let stop = demo.stop_flag();
        demo.spawn(Box::new(handler));
        ("demo".to_string(), Source::Demo(stop))
    } else {
        let mqtt = MqttSource::new(&config);
        let handle = mqtt.handle();
        mqtt.spawn(Box::new(handler));
        (config.broker_addr(), Source::Mqtt(handle))
    };

    let mut exit_code = 0;
    if args.headless {
        run_headless(&store, &config);
    } else {
        let info = ViewInfo {
            source: source_label,
            topic: config.topic.clone(),
            capacity: config.capacity,
        };
        let app = App::new(store, stats, info);
        if let Err(e) = app.run(config.interval()) {
            error!(error = %e, "terminal error");
            eprintln!("Error running TUI: {}", e);
            exit_code = 1;
        }
    }

    source.stop();
    info!("mqtt-plot stopped");
    std::process::exit(exit_code);
}
