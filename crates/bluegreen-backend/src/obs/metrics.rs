//! Metrics registry for the backend.
//!
//! Counter/gauge/histogram types with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors so a series is identified by
//! its label set regardless of the order callers pass them in. Float values
//! (latency sums, the amount accumulator) are stored as `f64` bits in an
//! `AtomicU64` and updated with a CAS loop.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Latency bucket upper bounds in seconds.
pub const LATENCY_BUCKETS: [f64; 9] = [0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_pairs(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `{a="1",b="2"}`, or nothing for an unlabeled series.
fn label_block(key: &[(String, String)]) -> String {
    if key.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", label_pairs(key))
    }
}

/// Render a float the way Prometheus clients do: integral values keep a
/// trailing `.0`, infinities become `+Inf`/`-Inf`.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn sorted_keys<V>(map: &DashMap<LabelKey, V>) -> Vec<LabelKey> {
    let mut keys: Vec<LabelKey> = map.iter().map(|r| r.key().clone()).collect();
    keys.sort();
    keys
}

#[derive(Default)]
struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    fn add(&self, v: f64) {
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                Some((f64::from_bits(cur) + v).to_bits())
            });
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Unlabeled integer counter.
#[derive(Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

/// Unlabeled counter accepting fractional increments.
#[derive(Default)]
pub struct FloatCounter {
    value: AtomicF64,
}

impl FloatCounter {
    pub fn add(&self, v: f64) {
        self.value.add(v);
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, format_float(self.get()));
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        for key in sorted_keys(&self.map) {
            let Some(r) = self.map.get(&key) else { continue };
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{} {}", name, label_block(&key), val);
        }
    }
}

/// Unlabeled signed gauge.
#[derive(Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }
    /// Decrement by 1.
    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicF64,
    buckets: [AtomicU64; LATENCY_BUCKETS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// Cumulative counts, one per entry of [`LATENCY_BUCKETS`].
    pub buckets: Vec<u64>,
    pub count: u64,
    pub sum: f64,
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a value in seconds and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], seconds: f64) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.add(seconds);

        // Cumulative: every bucket whose bound is >= the value.
        for (i, &le) in LATENCY_BUCKETS.iter().enumerate() {
            if seconds <= le {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self, labels: &[(&str, &str)]) -> Option<HistogramSnapshot> {
        let hist = self.map.get(&label_key(labels))?;
        Some(HistogramSnapshot {
            buckets: hist
                .buckets
                .iter()
                .map(|b| b.load(Ordering::Relaxed))
                .collect(),
            count: hist.count.load(Ordering::Relaxed),
            sum: hist.sum.load(),
        })
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        for key in sorted_keys(&self.map) {
            let Some(r) = self.map.get(&key) else { continue };
            let hist = r.value();

            let labels = label_pairs(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in LATENCY_BUCKETS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    name,
                    prefix,
                    format_float(le),
                    count
                );
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let block = label_block(&key);
            let _ = writeln!(out, "{}_sum{} {}", name, block, format_float(hist.sum.load()));
            let _ = writeln!(out, "{}_count{} {}", name, block, count);
        }
    }
}

/// Every instrument the backend exposes on `/metrics`.
///
/// Constructed once in `AppState` and shared by handle; there is no global
/// registry.
#[derive(Default)]
pub struct BackendMetrics {
    namespace: String,
    requests_total: CounterVec,
    request_latency: HistogramVec,
    active_requests: Gauge,
    calculate_total: Counter,
    calculate_amount_sum: FloatCounter,
}

impl BackendMetrics {
    /// `namespace` is prepended to every metric name (`backend` yields
    /// `backend_requests_total`). Pass `""` for bare names.
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Self::default()
        }
    }

    fn name(&self, base: &str) -> String {
        if self.namespace.is_empty() {
            base.to_string()
        } else {
            format!("{}_{}", self.namespace, base)
        }
    }

    /// Count one finished request and observe its latency.
    ///
    /// Inputs are not validated; a negative latency lands in every bucket.
    pub fn record_request(&self, endpoint: &str, method: &str, status: u16, latency_seconds: f64) {
        let status = status.to_string();
        self.requests_total.inc(&[
            ("endpoint", endpoint),
            ("method", method),
            ("status", status.as_str()),
        ]);
        self.request_latency
            .observe(&[("endpoint", endpoint), ("method", method)], latency_seconds);
    }

    pub fn increment_active(&self) {
        self.active_requests.inc();
    }

    pub fn decrement_active(&self) {
        self.active_requests.dec();
    }

    pub fn record_calculation(&self, amount: f64) {
        self.calculate_total.inc();
        self.calculate_amount_sum.add(amount);
    }

    pub fn active_requests(&self) -> i64 {
        self.active_requests.get()
    }

    pub fn requests_total(&self, endpoint: &str, method: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.requests_total.get(&[
            ("endpoint", endpoint),
            ("method", method),
            ("status", status.as_str()),
        ])
    }

    pub fn request_latency(&self, endpoint: &str, method: &str) -> Option<HistogramSnapshot> {
        self.request_latency
            .snapshot(&[("endpoint", endpoint), ("method", method)])
    }

    pub fn calculate_total(&self) -> u64 {
        self.calculate_total.get()
    }

    pub fn calculate_amount_sum(&self) -> f64 {
        self.calculate_amount_sum.get()
    }

    /// Render all registered metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests_total.render(
            &self.name("requests_total"),
            "Total number of requests",
            &mut out,
        );
        self.request_latency.render(
            &self.name("request_latency_seconds"),
            "Request latency in seconds",
            &mut out,
        );
        self.active_requests.render(
            &self.name("active_requests"),
            "Number of active requests",
            &mut out,
        );
        self.calculate_total.render(
            &self.name("calculate_total"),
            "Total calculations performed",
            &mut out,
        );
        self.calculate_amount_sum.render(
            &self.name("calculate_amount_sum"),
            "Sum of all amounts calculated",
            &mut out,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_does_not_split_series() {
        let c = CounterVec::default();
        c.inc(&[("method", "GET"), ("endpoint", "/")]);
        c.inc(&[("endpoint", "/"), ("method", "GET")]);
        assert_eq!(c.get(&[("endpoint", "/"), ("method", "GET")]), 2);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let m = BackendMetrics::new("");
        for s in [0.005, 0.03, 0.3, 3.0, 7.0] {
            m.record_request("/x", "GET", 200, s);
        }
        let snap = m.request_latency("/x", "GET").unwrap();
        assert_eq!(snap.count, 5);
        assert_eq!(snap.buckets, vec![1, 1, 2, 2, 2, 3, 3, 3, 4]);
        assert!((snap.sum - 10.335).abs() < 1e-9);
        assert!(snap.buckets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn negative_latency_is_accepted() {
        let m = BackendMetrics::new("");
        m.record_request("/x", "GET", 200, -1.0);
        let snap = m.request_latency("/x", "GET").unwrap();
        assert_eq!(snap.buckets, vec![1; 9]);
        assert_eq!(snap.sum, -1.0);
    }

    #[test]
    fn calculation_counters() {
        let m = BackendMetrics::new("backend");
        m.record_calculation(10.5);
        m.record_calculation(0.25);
        assert_eq!(m.calculate_total(), 2);
        assert_eq!(m.calculate_amount_sum(), 10.75);
    }

    #[test]
    fn active_gauge_up_and_down() {
        let m = BackendMetrics::new("backend");
        m.increment_active();
        m.increment_active();
        assert_eq!(m.active_requests(), 2);
        m.decrement_active();
        m.decrement_active();
        assert_eq!(m.active_requests(), 0);
    }

    #[test]
    fn render_exposition_lines() {
        let m = BackendMetrics::new("backend");
        m.record_request("/calculate", "POST", 200, 0.02);
        m.record_calculation(10.5);
        let out = m.render();

        assert!(out.contains("# TYPE backend_requests_total counter"));
        assert!(out.contains(
            "backend_requests_total{endpoint=\"/calculate\",method=\"POST\",status=\"200\"} 1"
        ));
        assert!(out.contains("# TYPE backend_request_latency_seconds histogram"));
        let bucket = "backend_request_latency_seconds_bucket";
        let labels = "endpoint=\"/calculate\",method=\"POST\"";
        for (le, n) in [("0.01", 0), ("0.025", 1), ("5.0", 1), ("+Inf", 1)] {
            let line = format!("{bucket}{{{labels},le=\"{le}\"}} {n}");
            assert!(out.contains(&line), "missing: {line}");
        }
        assert!(out.contains(
            "backend_request_latency_seconds_count{endpoint=\"/calculate\",method=\"POST\"} 1"
        ));
        assert!(out.contains("backend_active_requests 0"));
        assert!(out.contains("backend_calculate_total 1"));
        assert!(out.contains("backend_calculate_amount_sum 10.5"));
    }

    #[test]
    fn render_has_no_side_effects() {
        let m = BackendMetrics::new("");
        m.record_request("/", "GET", 200, 0.001);
        let a = m.render();
        let b = m.render();
        assert_eq!(a, b);
        assert_eq!(m.requests_total("/", "GET", 200), 1);
    }

    #[test]
    fn label_values_are_escaped() {
        let c = CounterVec::default();
        c.inc(&[("endpoint", "/a\"b\\c\n")]);
        let mut out = String::new();
        c.render("x_total", "x", &mut out);
        assert!(out.contains(r#"x_total{endpoint="/a\"b\\c\n"} 1"#));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.025), "0.025");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(21.0), "21.0");
    }
}
