//! Human-readable titles derived from machine keys.

/// Turn a key such as `led_count` into a label such as `Led Count`.
///
/// Every character that is not an ASCII letter or digit becomes a space,
/// then the first character of each space-delimited word is upper-cased.
/// The rest of each word is left as is.
///
/// ```rust
/// use schemaform::titleize;
///
/// assert_eq!(titleize("led_count"), "Led Count");
/// assert_eq!(titleize("rgb2-value"), "Rgb2 Value");
/// ```
pub fn titleize(key: &str) -> String {
    let mut title = String::with_capacity(key.len());
    let mut word_start = true;

    for c in key.chars() {
        if c.is_ascii_alphanumeric() {
            if word_start {
                title.push(c.to_ascii_uppercase());
            } else {
                title.push(c);
            }
            word_start = false;
        } else {
            title.push(' ');
            word_start = true;
        }
    }

    title
}
