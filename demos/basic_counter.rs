use countkit::ds::MinMaxCounter;

fn main() {
    let mut counter = MinMaxCounter::new();

    for word in "the quick brown fox jumps over the lazy dog the end".split_whitespace() {
        counter.increment(word);
    }

    println!("max: {:?}", counter.max());
    println!("min: {:?}", counter.min());
    println!("count(the): {}", counter.count("the"));

    counter.decrement("end");
    println!("count(end) after decrement: {}", counter.count("end"));

    #[cfg(feature = "metrics")]
    {
        use countkit::metrics::exporter::PrometheusTextExporter;
        use countkit::metrics::traits::MetricsExporter;

        let exporter = PrometheusTextExporter::new("words", std::io::stdout());
        exporter.export(&counter.metrics_snapshot());
    }
}

// Expected output (first four lines):
// max: Some(("the", 3))
// min: Some(("end", 1))
// count(the): 3
// count(end) after decrement: 0
//
// Explanation: "the" is the only word seen three times. Every other word sits
// at count 1, and "end" arrived there last, so it is the newest at the floor.
