use std::fmt::Display;

use console::{style, StyledObject};

/// What a piece of terminal text is, as far as colouring goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Banner,
    Heading,
    Label,
    Count,
    Written,
    Notice,
}

pub fn paint(tone: Tone, text: impl Display) -> StyledObject<String> {
    let text = style(text.to_string());
    match tone {
        Tone::Banner => text.magenta().bold(),
        Tone::Heading => text.bright().underlined(),
        Tone::Label => text.dim(),
        Tone::Count => text.bright().yellow(),
        Tone::Written => text.bright().green(),
        Tone::Notice => text.cyan(),
    }
}
