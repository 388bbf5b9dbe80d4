// Chat event loop.
//
// The transport adapter (whatever actually speaks to the chat service)
// feeds inbound messages through an mpsc channel and drains replies from
// another. One message is handled to completion before the next is read;
// the core holds no state between messages, so there is nothing to guard.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, Reply};
use crate::report::HelpDocument;

/// An opaque handle naming the channel a message arrived on; replies carry
/// it back unchanged.
pub type ChannelRef = String;

/// An inbound chat message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// True when the message was authored by this bot's own account.
    pub sender_is_self: bool,
    pub channel: ChannelRef,
    pub text: String,
}

/// An outbound reply for the transport to deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text { channel: ChannelRef, body: String },
    Rich { channel: ChannelRef, document: HelpDocument },
}

/// Run the chat loop until the inbound channel closes.
///
/// Messages authored by the bot itself and messages that are not
/// recognized commands are dropped without a reply. Exits early if the
/// transport stops draining replies.
pub async fn run(
    dispatcher: Dispatcher,
    mut rx: mpsc::Receiver<ChatMessage>,
    tx: mpsc::Sender<Outbound>,
) -> anyhow::Result<()> {
    info!("chat loop started");

    while let Some(msg) = rx.recv().await {
        if msg.sender_is_self {
            continue;
        }

        let Some(reply) = dispatcher.handle_message(&msg.text).await else {
            debug!("no command in message, ignoring");
            continue;
        };

        let outbound = match reply {
            Reply::Text(body) => Outbound::Text {
                channel: msg.channel,
                body,
            },
            Reply::Rich(document) => Outbound::Rich {
                channel: msg.channel,
                document,
            },
        };
        if tx.send(outbound).await.is_err() {
            info!("reply channel closed, shutting down");
            break;
        }
    }

    info!("chat loop exiting");
    Ok(())
}
