//! Example: classify descriptions passed on the command line.
//!
//! Run with: cargo run --example classify_text -- "the heater is broken again"

use keyword_classifier::{Classifier, KeywordClassifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = KeywordClassifier::new();
    println!("Using classifier: {}", classifier.name());

    let descriptions: Vec<String> = std::env::args().skip(1).collect();
    if descriptions.is_empty() {
        println!("Usage: classify_text <description>...");
        return Ok(());
    }

    for description in descriptions {
        let result = classifier.classify(&description).await?;
        println!("---");
        println!("Issue Type: {}", result.issue_type);
        println!("Urgency:    {}", result.urgency);
        println!("Tone:       {}", result.tone);
        println!("Summary:    {}", result.summary);
    }

    Ok(())
}
