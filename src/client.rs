mod slack_client;

pub use slack_client::{Block, Element, SlackBotToken, SlackClient, SlackMessage, TextObject};
