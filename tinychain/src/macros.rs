/// Creates a single [`ChatMessage`](crate::ChatMessage) from a role shorthand.
///
/// ```rust
/// use tinychain::{Role, tc_msg};
///
/// let message = tc_msg!(assistant => "Done.");
/// assert_eq!(message.role(), Role::Assistant);
/// assert_eq!(message.content(), "Done.");
/// ```
#[macro_export]
macro_rules! tc_msg {
    (system => $content:expr $(,)?) => {
        $crate::ChatMessage::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::ChatMessage::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::ChatMessage::assistant($content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<ChatMessage>` from role/content pairs.
///
/// ```rust
/// use tinychain::{Role, tc_messages};
///
/// let messages = tc_messages![
///     system => "You are concise.",
///     user => "Tell me a joke about chickens.",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role(), Role::System);
/// assert_eq!(messages[1].role(), Role::User);
/// ```
#[macro_export]
macro_rules! tc_messages {
    () => {
        Vec::<$crate::ChatMessage>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::tc_msg!($role => $content)),+]
    };
}

/// Builds a [`Chain`](crate::Chain) from stages listed in order.
///
/// ```rust
/// use tinychain::{FnStage, PromptFormatter, tc_chain};
///
/// let chain = tc_chain![
///     PromptFormatter::from_template("{greeting}, world"),
///     FnStage::new("shout", |text| Ok(text.to_uppercase())),
/// ];
/// assert_eq!(chain.stage_names(), vec!["prompt_formatter", "shout"]);
/// ```
#[macro_export]
macro_rules! tc_chain {
    () => {
        $crate::Chain::builder().build()
    };
    ($($stage:expr),+ $(,)?) => {
        $crate::Chain::builder()$(.stage($stage))+.build()
    };
}
