//! Third-party tracking snippets.

const PIXEL_SCRIPT: &str = r#"!function(f,b,e,v,n,t,s){if(f.fbq)return;n=f.fbq=function(){n.callMethod?n.callMethod.apply(n,arguments):n.queue.push(arguments)};if(!f._fbq)f._fbq=n;n.push=n;n.loaded=!0;n.version='2.0';n.queue=[];t=b.createElement(e);t.async=!0;t.src=v;s=b.getElementsByTagName(e)[0];s.parentNode.insertBefore(t,s)}(window,document,'script','https://connect.facebook.net/en_US/fbevents.js');"#;

/// Facebook pixel bootstrap for `pixel_id`.
///
/// Pixel ids are numeric; anything else is stripped so the id cannot break
/// out of the script. An id with nothing left renders nothing.
pub fn render_tracking_script(pixel_id: Option<&str>) -> String {
    let id: String = pixel_id
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if id.is_empty() {
        return String::new();
    }

    format!(
        "<script id=\"facebook-pixel\" async>{}fbq('init','{}');fbq('track','PageView');</script>",
        PIXEL_SCRIPT, id
    )
}
