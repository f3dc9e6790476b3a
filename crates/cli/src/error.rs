// SPDX-License-Identifier: MIT

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains every source error's text,
/// skip the "Caused by" chain — common when thiserror variants use
/// `#[error("... {0}")]` with `#[from]` and would otherwise repeat
/// themselves.
pub fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
