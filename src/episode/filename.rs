/// Derive the on-disk filename for an episode title.
///
/// `#` is stripped first because many podcasts number episodes with it.
/// Everything that is not an ASCII letter, digit, or whitespace is then
/// dropped, and each whitespace character becomes `_`. The `.mp3` suffix
/// assumes every enclosure is an MP3; there is no content-type sniffing
/// and no collision handling for titles that sanitize to the same name.
pub fn episode_filename(raw_title: &str) -> String {
    let cleaned: String = raw_title
        .chars()
        .filter(|c| *c != '#')
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    format!("{cleaned}.mp3")
}
