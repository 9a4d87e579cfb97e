//! Page shell: document head and the wrapper around page sections.

use crate::escape::html_escape;

/// Head content for the shell.
#[derive(Debug, Clone, Default)]
pub struct HeadContent {
    pub title: Option<String>,
    /// `(name, content)` meta tags.
    pub meta: Vec<(String, String)>,
    /// Stylesheet hrefs.
    pub stylesheets: Vec<String>,
    /// Raw HTML appended to the head, e.g. tracking snippets.
    pub extra: Vec<String>,
}

impl HeadContent {
    /// Create new head content with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.stylesheets.push(href.to_string());
        self
    }

    /// Append trusted HTML to the head.
    pub fn with_raw(mut self, html: impl Into<String>) -> Self {
        let html = html.into();
        if !html.is_empty() {
            self.extra.push(html);
        }
        self
    }

    /// Render head content to HTML.
    pub fn render(&self) -> String {
        let mut html = String::from("<meta charset=\"utf-8\">\n");

        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                html_escape(name),
                html_escape(content)
            ));
        }

        for href in &self.stylesheets {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                html_escape(href)
            ));
        }

        for extra in &self.extra {
            html.push_str(extra);
            html.push('\n');
        }

        html
    }
}

/// Document shell with a slot for the page body.
#[derive(Debug, Clone)]
pub struct Shell {
    pub lang: String,
    pub head: HeadContent,
    /// HTML before the page sections (header, announcement bar).
    pub body_start: String,
    /// HTML after the page sections.
    pub body_end: String,
}

impl Shell {
    /// Create a shell with the site header and footer.
    pub fn new(head: HeadContent) -> Self {
        Self {
            lang: "en".to_string(),
            head,
            body_start: SITE_HEADER.to_string(),
            body_end: SITE_FOOTER.to_string(),
        }
    }

    /// Insert HTML above the site header.
    pub fn with_banner(mut self, html: &str) -> Self {
        if !html.is_empty() {
            self.body_start = format!("{}\n{}", html, self.body_start);
        }
        self
    }

    pub fn with_body_end(mut self, html: impl Into<String>) -> Self {
        self.body_end = html.into();
        self
    }

    /// Render the opening part of the document (before sections).
    pub fn render_opening(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}</head>\n<body>\n{}<main>\n",
            html_escape(&self.lang),
            self.head.render(),
            self.body_start
        )
    }

    /// Render the closing part of the document (after sections).
    pub fn render_closing(&self) -> String {
        format!("</main>\n{}</body>\n</html>\n", self.body_end)
    }

    /// Render a full document around `sections`.
    pub fn render_page<S: AsRef<str>>(&self, sections: &[S]) -> String {
        let mut html = self.render_opening();
        for section in sections {
            html.push_str(section.as_ref());
            html.push('\n');
        }
        html.push_str(&self.render_closing());
        html
    }
}

const SITE_HEADER: &str = r#"<header class="site-header">
    <a href="/" class="logo">Shopfront</a>
    <form action="/products" method="get" class="search-form">
        <input type="search" name="search" placeholder="Search products..." aria-label="Search">
    </form>
    <nav class="header-nav">
        <a href="/products">Shop</a>
        <a href="/products?new_drops=true">New Drops</a>
        <a href="/products?best_selling=true">Trending</a>
    </nav>
</header>
"#;

const SITE_FOOTER: &str = r#"<footer class="site-footer">
    <p>Cash on delivery across Bangladesh.</p>
</footer>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_escapes_title_and_meta() {
        let head = HeadContent::new("Men & Women <Sale>")
            .with_meta("description", "\"quoted\"")
            .render();
        assert!(head.contains("<title>Men &amp; Women &lt;Sale&gt;</title>"));
        assert!(head.contains(r#"content="&quot;quoted&quot;""#));
    }

    #[test]
    fn test_page_wraps_sections_in_order() {
        let shell = Shell::new(HeadContent::new("Home")).with_banner("<div class=\"bar\">hi</div>");
        let page = shell.render_page(&["<section>a</section>", "<section>b</section>"]);

        assert!(page.starts_with("<!DOCTYPE html>"));
        let bar = page.find("class=\"bar\"").unwrap();
        let header = page.find("site-header").unwrap();
        let a = page.find("<section>a").unwrap();
        let b = page.find("<section>b").unwrap();
        assert!(bar < header && header < a && a < b);
        assert!(page.trim_end().ends_with("</html>"));
    }
}
