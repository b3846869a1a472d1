//! +echo: repeats everything after the command name.

use anyhow::{bail, Result};
use serenity::async_trait;

use crate::commands::{CommandEnv, MessageContext, TextCommand, TextModule};
use crate::dispatcher::text_arguments;

pub fn echo(env: &CommandEnv) -> TextModule {
    TextModule::new("echo", Echo { prefix: env.prefix })
}

struct Echo {
    prefix: char,
}

#[async_trait]
impl TextCommand for Echo {
    async fn execute(&self, ctx: &dyn MessageContext) -> Result<()> {
        let args = text_arguments(ctx.content(), self.prefix).unwrap_or("").trim();
        if args.is_empty() {
            bail!("nothing to echo");
        }
        ctx.reply(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::text::test_support::FakeMessage;

    #[tokio::test]
    async fn test_echo_repeats_arguments() {
        let msg = FakeMessage::new("+echo hello there", 1);
        Echo { prefix: '+' }.execute(&msg).await.unwrap();
        assert_eq!(msg.replies(), vec!["hello there"]);
    }

    #[tokio::test]
    async fn test_echo_keeps_multiline_payload() {
        let msg = FakeMessage::new("+echo\nline one\nline two", 1);
        Echo { prefix: '+' }.execute(&msg).await.unwrap();
        assert_eq!(msg.replies(), vec!["line one\nline two"]);
    }

    #[tokio::test]
    async fn test_echo_without_payload_fails() {
        let msg = FakeMessage::new("+echo   ", 1);
        let err = Echo { prefix: '+' }.execute(&msg).await.unwrap_err();
        assert_eq!(err.to_string(), "nothing to echo");
        assert!(msg.replies().is_empty());
    }
}
