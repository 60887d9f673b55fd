//! Message validation and parsing.
//!
//! The [`MessageParser`] decides whether a message is eligible for command
//! processing and turns eligible messages into an [`InvocationContext`].
//! Parsing never fails: deciding whether a message is meant for a given
//! command is left to each command's activation predicate.

use std::collections::HashSet;

use command_parser::Parser;
use log::{debug, trace};

use crate::commands::context::{InboundMessage, InvocationContext};

/// Eligibility rules applied to every inbound message.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    /// Character every command starts with
    pub prefix: char,
    /// Matrix user ID of the bot, its own messages are ignored
    pub bot_user_id: String,
    /// Rooms the bot answers in, empty means all rooms
    pub allowed_rooms: HashSet<String>,
}

pub struct MessageParser {
    /// Command parser splitting the command name from its arguments
    parser: Parser,
    policy: EligibilityPolicy,
}

impl MessageParser {
    pub fn new(policy: EligibilityPolicy) -> Self {
        let parser = Parser::new(policy.prefix, '-');
        MessageParser { parser, policy }
    }

    /// Returns true if the message should go through command dispatch.
    ///
    /// Rejects empty messages, messages sent by the bot itself, messages from
    /// rooms outside the allow list and messages without the command prefix.
    pub fn is_valid(&self, message: &InboundMessage) -> bool {
        let body = message.body.trim();

        if body.is_empty() {
            return false;
        }

        if message.sender_id == self.policy.bot_user_id {
            trace!("ignoring own message {}", message.event_id);
            return false;
        }

        if !self.policy.allowed_rooms.is_empty()
            && !self.policy.allowed_rooms.contains(&message.room_id)
        {
            trace!("ignoring message from room {}", message.room_id);
            return false;
        }

        body.starts_with(self.policy.prefix)
    }

    /// Builds the invocation context of a message that passed [`Self::is_valid`].
    pub fn parse(&self, message: &InboundMessage) -> InvocationContext {
        let body = message.body.trim();
        let (command, args) = self.split(body);

        debug!("parsed command {} with arguments {:?}", command, args);

        InvocationContext {
            raw: message.body.clone(),
            prefix: self.policy.prefix,
            command,
            args,
            sender_id: message.sender_id.clone(),
            sender: message.sender.clone(),
            bot_member: message.bot_member.clone(),
            room_id: message.room_id.clone(),
            event_id: message.event_id.clone(),
            server: None,
        }
    }

    fn split(&self, body: &str) -> (String, Vec<String>) {
        let tokens: Vec<&str> = body.split_whitespace().collect();

        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let padded = body.to_string() + " dummy";

        // The parser treats `-` prefixed words as options, which would drop them
        // from the arguments. Only trust it when every token is accounted for.
        if let Ok(parsed) = self.parser.parse(&padded)
            && parsed.arguments.len() + 1 == tokens.len()
        {
            return (parsed.name.to_lowercase(), parsed.arguments);
        }

        trace!("falling back to whitespace tokenization for {}", body);

        let mut tokens = tokens.into_iter();
        let command = tokens
            .next()
            .map(|t| t.trim_start_matches(self.policy.prefix).to_lowercase())
            .unwrap_or_default();

        (command, tokens.map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::test_utils::message;

    fn create_parser() -> MessageParser {
        MessageParser::new(EligibilityPolicy {
            prefix: '!',
            bot_user_id: "@wombot:example.com".to_string(),
            allowed_rooms: HashSet::new(),
        })
    }

    #[test]
    fn test_is_valid_command() {
        assert!(create_parser().is_valid(&message("!player Zezima")));
    }

    #[test]
    fn test_is_valid_rejects_empty_body() {
        assert!(!create_parser().is_valid(&message("   ")));
    }

    #[test]
    fn test_is_valid_rejects_regular_chat() {
        assert!(!create_parser().is_valid(&message("hello there")));
    }

    #[test]
    fn test_is_valid_rejects_own_messages() {
        let mut own = message("!help");
        own.sender_id = "@wombot:example.com".to_string();
        assert!(!create_parser().is_valid(&own));
    }

    #[test]
    fn test_is_valid_rejects_rooms_outside_allow_list() {
        let parser = MessageParser::new(EligibilityPolicy {
            prefix: '!',
            bot_user_id: "@wombot:example.com".to_string(),
            allowed_rooms: HashSet::from(["!other:example.com".to_string()]),
        });
        assert!(!parser.is_valid(&message("!help")));
    }

    #[test]
    fn test_is_valid_accepts_rooms_in_allow_list() {
        let parser = MessageParser::new(EligibilityPolicy {
            prefix: '!',
            bot_user_id: "@wombot:example.com".to_string(),
            allowed_rooms: HashSet::from(["!room:example.com".to_string()]),
        });
        assert!(parser.is_valid(&message("!help")));
    }

    #[test]
    fn test_parse_command_and_arguments() {
        let ctx = create_parser().parse(&message("!player Lynx Titan"));
        assert_eq!(ctx.command, "player");
        assert_eq!(ctx.args, vec!["Lynx", "Titan"]);
        assert_eq!(ctx.prefix, '!');
        assert_eq!(ctx.room_id, "!room:example.com");
        assert_eq!(ctx.sender_id, "@user:example.com");
        assert!(ctx.server.is_none());
    }

    #[test]
    fn test_parse_command_is_lowercased() {
        let ctx = create_parser().parse(&message("!HELP"));
        assert_eq!(ctx.command, "help");
        assert!(ctx.args.is_empty());
    }

    #[test]
    fn test_parse_keeps_dash_prefixed_arguments() {
        let ctx = create_parser().parse(&message("!player -x- Man"));
        assert_eq!(ctx.command, "player");
        assert_eq!(ctx.args, vec!["-x-", "Man"]);
    }

    #[test]
    fn test_parse_is_total_for_prefix_only() {
        let ctx = create_parser().parse(&message("!"));
        assert_eq!(ctx.command, "");
        assert!(ctx.args.is_empty());
    }

    #[test]
    fn test_parse_keeps_raw_body() {
        let ctx = create_parser().parse(&message("!ehp please"));
        assert_eq!(ctx.raw, "!ehp please");
    }
}
