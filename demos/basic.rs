//! Minimal tour of the hierarchical logger: run with `cargo run --example basic`.

use logtree::{Config, Field};

fn main() {
    // one config for the whole tree: console output, /db at debug
    let mut config = Config::new();
    config.handler = "console".to_string();
    config.named.insert(
        "/db".to_string(),
        Config {
            level: "debug".to_string(),
            ..Default::default()
        },
    );
    logtree::set_default(&config);

    logtree::info("starting up", &[Field::new("port", 8080)]);

    let db = logtree::get("/db");
    db.debug("connected", &[Field::new("host", "db1")]);
    db.info("schema loaded", &[Field::new("tables", 12)]);

    // the /http logger inherits the root settings: debug is filtered out
    let http = logtree::get("/http");
    http.debug("not shown", &[]);
    http.warn("listener restarted", &[Field::new("attempt", 2)]);

    // repeated warnings throttled to one per period
    let throttled = http.throttle("slow-request");
    for _ in 0..100 {
        throttled.warn("slow request", &[Field::new("path", "/search")]);
    }

    logtree::close_log_files();
}
