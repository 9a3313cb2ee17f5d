use crate::platform::IncomingMessage;

/// Phrases longer than this collapse to their first word.
const MAX_QUERY_WORDS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The trigger was sent as a reply to another message
    Reply,
    /// The message itself starts with the trigger
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub word: String,
    pub mode: Mode,
}

/// User-facing hints sent instead of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    /// Reply mode, but the replied-to message carries no text or caption
    NeedTextReply,
    /// Direct mode with nothing after the trigger
    MissingWord,
}

impl Guidance {
    pub fn text(&self) -> &'static str {
        match self {
            Guidance::NeedTextReply => "لطفاً روی یک پیام متنی ریپلای کن (مثلاً `آسمان`).",
            Guidance::MissingWord => {
                "برای استفاده: روی پیام کلمه ریپلای کن و `دهخدا` بنویس، یا `دهخدا کلمه` بنویس."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Ordinary chat traffic
    Ignore,
    Guidance(Guidance),
    Query(Query),
}

/// Derive the search word from an incoming message.
pub fn extract(msg: &IncomingMessage, trigger: &str) -> Extraction {
    let text = msg.text.trim();

    if let Some(replied) = &msg.reply_to {
        if let Some((_, after)) = text.split_once(trigger) {
            let after = after.trim();
            let phrase = if !after.is_empty() {
                after.lines().next().unwrap_or_default().trim()
            } else {
                let fallback = replied
                    .text
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .or(replied.caption.as_deref())
                    .unwrap_or_default()
                    .trim();
                if fallback.is_empty() {
                    return Extraction::Guidance(Guidance::NeedTextReply);
                }
                fallback
            };

            return Extraction::Query(Query {
                word: collapse_long_phrase(phrase),
                mode: Mode::Reply,
            });
        }
    }

    if let Some(after) = text.strip_prefix(trigger) {
        return match after.split_whitespace().next() {
            Some(word) => Extraction::Query(Query {
                word: word.to_string(),
                mode: Mode::Direct,
            }),
            None => Extraction::Guidance(Guidance::MissingWord),
        };
    }

    Extraction::Ignore
}

/// Keep a short phrase as-is; reduce a long one to its first word so a
/// whole paragraph is never sent to the dictionary.
fn collapse_long_phrase(phrase: &str) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() > MAX_QUERY_WORDS {
        words[0].to_string()
    } else {
        phrase.to_string()
    }
}
