use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.NAME }}` and `{{ env.NAME | default("value") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("placeholder pattern is valid")
    })
}

/// Expand `{{ env.NAME }}` placeholders in raw config text
///
/// A `| default("...")` suffix supplies the value used when the variable is
/// unset. Lines that are TOML comments are copied through untouched so a
/// commented-out secret never has to exist in the environment.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    let mut expanded = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_string())
            } else {
                expand_line(line)
            }
        })
        .collect::<anyhow::Result<Vec<_>>>()?
        .join("\n");

    if input.ends_with('\n') {
        expanded.push('\n');
    }

    Ok(expanded)
}

fn expand_line(line: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;

    for caps in placeholder().captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };

        out.push_str(&line[cursor..whole.start()]);
        out.push_str(&resolve(&caps)?);
        cursor = whole.end();
    }

    out.push_str(&line[cursor..]);
    Ok(out)
}

fn resolve(caps: &Captures<'_>) -> anyhow::Result<String> {
    let key = caps.get(1).map_or("", |m| m.as_str());
    let fallback = caps.get(2).map(|m| m.as_str());

    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        anyhow::bail!("only variables scoped with 'env.' are supported: `{key}`");
    };

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => anyhow::bail!("environment variable not found: `{name}`"),
    }
}
