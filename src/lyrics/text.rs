//! Helpers for turning lyrics bodies into display text.
//!
//! LRCLIB returns `plainLyrics` as newline-separated text and optionally
//! `syncedLyrics` in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! When only the synced variant is present we strip the timing to get a
//! plain body.

/// Number of lines that contain something other than whitespace.
pub fn count_lines(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Convert LRC content into plain, newline-separated lyrics ordered by time.
///
/// Metadata tags like `[ti:Title]` are dropped. A line carrying several
/// timestamps (`[00:12.00][00:40.00]Chorus`) appears once per timestamp.
pub fn strip_timestamps(lrc: &str) -> String {
    let mut timed: Vec<(u64, String)> = Vec::new();

    for line in lrc.lines() {
        let line = line.trim();
        if line.is_empty() || is_metadata(line) {
            continue;
        }

        match split_timed_line(line) {
            Some((stamps, text)) => {
                for ts in stamps {
                    timed.push((ts, text.to_string()));
                }
            }
            None if !line.starts_with('[') => timed.push((0, line.to_string())),
            None => {}
        }
    }

    // Stable: untimed lines keep their relative order.
    timed.sort_by_key(|(ts, _)| *ts);
    timed
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[ti:Title]`, `[ar:Artist]`, ... but not `[00:12.34]`.
fn is_metadata(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('[') else {
        return false;
    };
    let Some(end) = rest.find(']') else {
        return false;
    };
    let Some((tag, _)) = rest[..end].split_once(':') else {
        return false;
    };
    !tag.is_empty() && tag.len() <= 6 && tag.chars().all(|c| c.is_ascii_alphabetic())
}

/// Leading timestamps (in ms) and the remaining text.
fn split_timed_line(line: &str) -> Option<(Vec<u64>, &str)> {
    let mut stamps = Vec::new();
    let mut rest = line;

    while let Some(inner) = rest.strip_prefix('[') {
        let Some(end) = inner.find(']') else { break };
        let Some(ms) = parse_timestamp(&inner[..end]) else { break };
        stamps.push(ms);
        rest = &inner[end + 1..];
    }

    if stamps.is_empty() {
        None
    } else {
        Some((stamps, rest.trim()))
    }
}

/// "mm:ss", "mm:ss.xx", "mm:ss.xxx" or "mm:ss:xx" to milliseconds.
fn parse_timestamp(s: &str) -> Option<u64> {
    let parts: Vec<&str> = s.split([':', '.']).collect();
    let (min, sec, frac) = match parts.as_slice() {
        [m, s] => (*m, *s, None),
        [m, s, f] => (*m, *s, Some(*f)),
        _ => return None,
    };
    let min: u64 = min.parse().ok()?;
    let sec: u64 = sec.parse().ok()?;
    let ms = match frac {
        None => 0,
        Some(f) => match f.len() {
            1 => f.parse::<u64>().ok()? * 100,
            2 => f.parse::<u64>().ok()? * 10,
            3 => f.parse().ok()?,
            _ => return None,
        },
    };
    min.checked_mul(60_000)?
        .checked_add(sec.checked_mul(1000)?)?
        .checked_add(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines_skips_blank_and_whitespace() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("one\n\n  \ntwo\n\tthree\n"), 3);
        assert_eq!(count_lines("只有一行"), 1);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:12"), Some(12000));
        assert_eq!(parse_timestamp("01:30"), Some(90000));
        assert_eq!(parse_timestamp("00:12.34"), Some(12340));
        assert_eq!(parse_timestamp("00:12.340"), Some(12340));
        assert_eq!(parse_timestamp("00:12:34"), Some(12340));
        assert_eq!(parse_timestamp("ti:Song"), None);
    }

    #[test]
    fn test_oversized_timestamp_is_not_timed() {
        assert_eq!(parse_timestamp("999999999999999999:00.00"), None);
        assert_eq!(parse_timestamp("00:18446744073709551615"), None);
        let lrc = "[999999999999999999:00.00]x\n[00:01.00]kept";
        assert_eq!(strip_timestamps(lrc), "kept");
    }

    #[test]
    fn test_strip_timestamps() {
        let lrc = r#"
[ti:Test Song]
[ar:Test Artist]
[00:15.00]Second line
[00:12.34]First line
[00:18.00][00:30.00]Chorus
[00:20.00]
"#;
        assert_eq!(strip_timestamps(lrc), "First line\nSecond line\nChorus\n\nChorus");
        assert_eq!(count_lines(&strip_timestamps(lrc)), 4);
    }
}
