use crate::models::{PrefixSettings, SubscriptionEntry};

/// Assemble the textual node list handed to clients or to the converter.
///
/// One line per entry: remote subscription URLs verbatim (the converter or
/// client fetches them itself), manual node URIs with the profile's name
/// prefix applied to the URI fragment when enabled. An optional traffic
/// placeholder line is prepended. Output always ends with a newline.
pub fn compose_node_list(
    entries: &[SubscriptionEntry],
    prepend: Option<&str>,
    prefix: Option<&PrefixSettings>,
) -> String {
    let mut out = String::new();

    if let Some(line) = prepend {
        out.push_str(line.trim());
        out.push('\n');
    }

    for entry in entries {
        let line = entry.url.trim();
        if line.is_empty() {
            continue;
        }
        if !entry.is_remote() {
            out.push_str(&apply_prefix(line, prefix));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    out
}

/// Rewrite the URI fragment from `#name` to `#{prefix}name`. URIs without a
/// fragment gain one holding just the prefix.
fn apply_prefix(uri: &str, prefix: Option<&PrefixSettings>) -> String {
    let Some(prefix) = prefix.filter(|p| p.enabled && !p.text.is_empty()) else {
        return uri.to_string();
    };
    let encoded = urlencoding::encode(&prefix.text);

    match uri.split_once('#') {
        Some((base, fragment)) => format!("{}#{}{}", base, encoded, fragment),
        None => format!("{}#{}", uri, encoded),
    }
}
