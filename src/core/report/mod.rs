pub mod aggregate;
pub mod tokenizer;

pub use aggregate::{Aggregator, ParseStats, Report};

/// Run the tokenizer and aggregator over a whole report body.
pub fn parse(text: &str) -> Report {
    let mut aggregator = Aggregator::new();
    for line in text.lines() {
        aggregator.push_line(line);
    }
    aggregator.into_report()
}
