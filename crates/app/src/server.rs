use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Router};
use medchat_core::{ChatModel, ChatService, Embedder, VectorIndex, ERROR_REPLY};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

const CHAT_PAGE: &str = include_str!("../templates/chat.html");

/// Routes of the chat front end. The shared service is built once at startup
/// and injected; handlers hold no state of their own.
pub fn router<E, V, M>(service: Arc<ChatService<E, V, M>>) -> Router
where
    E: Embedder + Send + Sync + 'static,
    V: VectorIndex + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(chat_page))
        .route("/get_answer", post(get_answer::<E, V, M>))
        .with_state(service)
}

async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

#[derive(Debug, Deserialize)]
struct ChatForm {
    /// A missing field is treated as an empty message.
    #[serde(default)]
    msg: String,
}

/// Always answers 200 with plain text: a greeting, the generated answer, or
/// the one fixed error string. Failure kinds stay in the logs only.
async fn get_answer<E, V, M>(
    State(service): State<Arc<ChatService<E, V, M>>>,
    Form(form): Form<ChatForm>,
) -> String
where
    E: Embedder + Send + Sync + 'static,
    V: VectorIndex + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    info!(message = %form.msg, "received chat message");

    match service.answer(&form.msg).await {
        Ok(answer) => answer,
        Err(chat_error) => {
            error!(error = %chat_error, "chat pipeline failed");
            ERROR_REPLY.to_string()
        }
    }
}
