use teloxide::utils::html;

/// Body of a definition reply, safe to send with HTML parse mode.
pub fn compose(query: &str, meaning: &str, group_tag: &str) -> String {
    format!(
        "🔍 معنی «{}» در لغت‌نامهٔ دهخدا:\n\n{}\n\nگروه بچه‌های ایرون {}",
        escape(query),
        escape(meaning),
        escape(group_tag)
    )
}

/// Telegram's HTML escape plus quotes, so scraped text can never open a tag or attribute.
pub fn escape(text: &str) -> String {
    html::escape(text)
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
