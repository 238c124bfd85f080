//! The capability a route dispatches messages to (spec §6). Modelled as a
//! trait rather than a bare function pointer since handlers are more often
//! a capturing struct than a raw `fn`; a blanket impl lets closures returning
//! a boxed future work too, matching `celerity_helpers::consumers::MessageHandler`'s
//! shape in spirit.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::message::Message;

#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, msg: &Message) -> Result<(), HandlerError>;
}

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>>;

#[async_trait]
impl<F> MessageHandler for F
where
    F: for<'a> Fn(&'a Message) -> HandlerFuture<'a> + Send + Sync,
{
    async fn handle(&self, msg: &Message) -> Result<(), HandlerError> {
        (self)(msg).await
    }
}
