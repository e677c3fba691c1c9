#![allow(dead_code)]

use http::uri::Scheme;
use serde::Deserialize;
use wirecall_core::{Dispatcher, RequestDescriptor, Verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    // Create a dispatcher; verbose mode logs a curl replay string per request.
    let dispatcher = Dispatcher::builder()
        .with_scheme(Scheme::HTTP)
        .with_host("dog.ceo")
        .with_port(80)
        .with_base_path("/api")
        .with_verbosity(Verbosity::Verbose)
        .build()?;

    // Simple get call with no parameters
    let breeds: DogCeoResult<ListMessage> = dispatcher
        .dispatch(&RequestDescriptor::get("/breeds/list"))
        .await?;
    println!("{breeds:#?}");

    // Body fields on a GET become query parameters
    let descriptor = RequestDescriptor::get("/breed/hound/images/random").with_field("count", 3);
    let images: DogCeoResult<Vec<String>> = dispatcher.dispatch(&descriptor).await?;
    println!("{images:#?}");

    Ok(())
}

type ListMessage = Vec<String>;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum DogCeoResult<T> {
    Success { message: T },
    Error { code: u16, message: String },
}
