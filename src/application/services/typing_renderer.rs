use std::time::Duration;

use futures::stream::Stream;

pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(50);

/// Replays an already complete answer word by word.
///
/// Each frame is the full text revealed so far and replaces the previous
/// frame on the display surface.
#[derive(Debug, Clone, Copy)]
pub struct TypingRenderer {
    delay: Duration,
}

impl TypingRenderer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn frames(&self, text: &str) -> impl Stream<Item = String> + Send + 'static {
        let tokens: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split(' ').map(str::to_string).collect()
        };
        let delay = self.delay;

        async_stream::stream! {
            let total = tokens.len();
            let mut accumulator = String::new();

            for (index, token) in tokens.into_iter().enumerate() {
                accumulator.push_str(&token);
                accumulator.push(' ');
                yield accumulator.clone();

                if index + 1 < total {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for TypingRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_DELAY)
    }
}
