//! Repair of known JSON malformations in UCTM API responses
//!
//! Some firmware versions emit almost-JSON with stray commas:
//! - a trailing comma before a closing brace or bracket: `{"a":1,}`
//! - a leading comma at the start of an array: `[,{"a":1}]`
//!
//! The caller applies this only after a strict decode has already failed,
//! so payloads whose string values merely *look* malformed are never touched.

/// Drop stray commas outside string literals: a comma whose next significant
/// character closes a brace/bracket, or one directly following an opening
/// bracket. Input that decodes as-is comes back unchanged.
pub fn repair(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut last_significant: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
                last_significant = Some(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().copied().find(|ch| !ch.is_whitespace());
                let trailing = matches!(next, Some('}') | Some(']'));
                let leading = last_significant == Some('[');
                if trailing || leading {
                    // stray comma, drop it
                    continue;
                }
                out.push(c);
                last_significant = Some(c);
            }
            _ => {
                out.push(c);
                if !c.is_whitespace() {
                    last_significant = Some(c);
                }
            }
        }
    }

    out
}
