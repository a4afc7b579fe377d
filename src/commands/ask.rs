use anyhow::{Result, bail};
use log::{debug, error};

use crate::{
    api::{ASK_PATH, AskService},
    config::join_url,
};

/// Ask the service a question and print the answer
#[tracing::instrument(skip(service))]
pub async fn ask<S: AskService + ?Sized>(service: &S, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Please enter a question.");
    }

    match service.ask(question).await {
        Ok(answer) => {
            debug!("Answer has {} characters", answer.answer.len());
            println!("{}", answer.answer);
            if let Some(model) = &answer.model {
                println!("Model: {}", model);
            }
            Ok(())
        }
        Err(e) => {
            error!(
                "Request failed: url={} status={:?} detail={:?} error={}",
                join_url(service.base_url(), ASK_PATH),
                e.status,
                e.detail,
                e
            );
            Err(e.into())
        }
    }
}
