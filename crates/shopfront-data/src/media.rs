//! Image URL resolution.

/// Resolve an image reference against the backend base URL.
///
/// Absolute `http(s)` URLs pass through. Relative paths get exactly one
/// leading slash and the base prefix. Blank references resolve to `None`.
pub fn image_url(base_url: &str, reference: Option<&str>) -> Option<String> {
    let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Some(reference.to_string());
    }

    let base = base_url.trim_end_matches('/');
    if reference.starts_with('/') {
        Some(format!("{}{}", base, reference))
    } else {
        Some(format!("{}/{}", base, reference))
    }
}
