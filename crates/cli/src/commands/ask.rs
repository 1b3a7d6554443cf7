//! Ask command handler.
//!
//! Routes a question to the best-matching document and, unless told not
//! to, generates an answer from that document.

use super::engine::Engine;
use super::print_json;
use clap::Args;
use docmatch_core::{config::AppConfig, AppResult};
use docmatch_knowledge::{generate_answer, Answer, Retrieval};
use docmatch_prompt::{load_prompt, ANSWER_PROMPT_ID};

/// Ask a question against the documentation
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Only report the matched document, skip answer generation
    #[arg(long)]
    pub no_answer: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.question.join(" ");
        let engine = Engine::from_config(config)?;

        let retrieval = engine.retriever.answer_question(&question).await?;

        let answer = match &retrieval.document {
            Some(_) if !self.no_answer => {
                let prompt = load_prompt(&config.workspace, ANSWER_PROMPT_ID)?;
                Some(
                    generate_answer(
                        engine.client.as_ref(),
                        &prompt,
                        &config.model,
                        &question,
                        &retrieval.content,
                    )
                    .await?,
                )
            }
            _ => None,
        };

        if self.json {
            self.print_json_output(&question, &retrieval, answer.as_ref())
        } else {
            self.print_text_output(&retrieval, answer.as_ref());
            Ok(())
        }
    }

    fn print_json_output(
        &self,
        question: &str,
        retrieval: &Retrieval,
        answer: Option<&Answer>,
    ) -> AppResult<()> {
        let output = serde_json::json!({
            "question": question,
            "document": retrieval.document,
            "score": retrieval.score,
            "queryKeywords": retrieval.query_keywords,
            "answer": answer.map(|a| &a.answer),
            "certainty": answer.map(|a| a.certainty),
            "model": answer.map(|a| &a.model),
        });
        print_json(&output)
    }

    fn print_text_output(&self, retrieval: &Retrieval, answer: Option<&Answer>) {
        let Some(document) = retrieval.document.as_deref() else {
            println!("No matching document found.");
            if !retrieval.query_keywords.is_empty() {
                println!("Suggested tags for a new document: {}", retrieval.query_keywords);
            }
            return;
        };

        match answer {
            Some(answer) => {
                println!("{}", answer.answer);
                println!();
                println!("Source: {} (certainty {:.1})", document, answer.certainty);
            }
            None => {
                println!("Matched document: {}", document);
                if let Some(score) = retrieval.score {
                    println!(
                        "Shared keywords: {} ({:.0}% of the question)",
                        score.matches,
                        score.ratio * 100.0
                    );
                }
            }
        }
    }
}
