//! Basic usage example for the Paper Assistant library.
//!
//! Fetches a few arXiv papers, summarizes the first one, asks a question about
//! it and buckets all abstracts by keyword. Runs with the local stand-in models
//! unless `HF_TOKEN` is set.

use paper_assistant::config::get_config;
use paper_assistant::models::Category;
use paper_assistant::ResearchAssistant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();
    let assistant = if config.inference.token.is_some() {
        ResearchAssistant::from_config(&config)?
    } else {
        ResearchAssistant::offline(&config)?
    };

    let topic = "machine learning and healthcare";
    println!("Fetching papers on: {}\n", topic);

    let papers = assistant.fetch_papers_strict(topic, 3).await?;
    for (i, paper) in papers.iter().enumerate() {
        println!("{}. {}", i + 1, paper.title.split_whitespace().collect::<Vec<_>>().join(" "));
        println!("   Authors: {}", paper.author_line());
        println!("   Published: {}", paper.published);
    }

    let Some(first) = papers.first() else {
        println!("No papers found.");
        return Ok(());
    };

    println!("\nSummary of the first paper:");
    println!("{}", assistant.summarize_paper(&first.summary).await?);

    let question = "What method is proposed?";
    let span = assistant
        .answer_question_with_span(question, &first.summary)
        .await?;
    println!("\nQ: {}", question);
    println!("A: {}", span.answer);
    println!("Excerpt [{}..{}]: {}", span.start, span.end, span.exact_part);

    let info = assistant.extract_key_information(&papers);
    println!();
    for category in Category::ALL {
        println!("{}: {} paper(s)", category, info.bucket(category).len());
    }

    Ok(())
}
