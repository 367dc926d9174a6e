use engine::EngineError;
use teloxide::RequestError;

/// Infrastructure failures. Mistakes in user input are `InputError`s and
/// never end up here.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("store error: {0}")]
    Store(#[from] EngineError),
    #[error("transport error: {0}")]
    Transport(#[from] RequestError),
}
