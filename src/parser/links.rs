use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::element_text;
use crate::model::{ImageRef, LinkRef};

static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Every `img` in document order, wherever it sits in the page.
pub fn extract_images(doc: &Html, base: &Url) -> Vec<ImageRef> {
    doc.select(&IMG)
        .map(|img| {
            let attr = |name: &str| img.value().attr(name).unwrap_or("").to_string();
            let src = attr("src");
            ImageRef {
                absolute_url: resolve(base, &src),
                alt: attr("alt"),
                title: attr("title"),
                src,
            }
        })
        .collect()
}

/// Every anchor that carries an `href`, in document order.
pub fn extract_links(doc: &Html, base: &Url) -> Vec<LinkRef> {
    doc.select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?.to_string();
            Some(LinkRef {
                text: element_text(&a),
                absolute_url: resolve(base, &href),
                href,
            })
        })
        .collect()
}

/// RFC 3986 reference resolution. Unresolvable references become "".
fn resolve(base: &Url, reference: &str) -> String {
    base.join(reference).map(String::from).unwrap_or_default()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://create.roblox.com/docs/tutorials/studio/explore-ui").unwrap()
    }

    #[test]
    fn images_resolve_relative_sources() {
        let doc = Html::parse_document(
            r#"<img src="/assets/a.png" alt="A" title="T">
               <div><img src="b.jpg"></div>
               <img src="https://cdn.example.com/c.webp" alt="C">"#,
        );
        let imgs = extract_images(&doc, &base());
        assert_eq!(imgs.len(), 3);
        assert_eq!(imgs[0].absolute_url, "https://create.roblox.com/assets/a.png");
        assert_eq!(imgs[0].alt, "A");
        assert_eq!(imgs[0].title, "T");
        assert_eq!(
            imgs[1].absolute_url,
            "https://create.roblox.com/docs/tutorials/studio/b.jpg"
        );
        assert_eq!(imgs[1].alt, "");
        assert_eq!(imgs[1].title, "");
        assert_eq!(imgs[2].absolute_url, "https://cdn.example.com/c.webp");
    }

    #[test]
    fn image_without_src_resolves_to_base() {
        let doc = Html::parse_document("<img alt=\"placeholder\">");
        let imgs = extract_images(&doc, &base());
        assert_eq!(imgs[0].src, "");
        assert_eq!(imgs[0].absolute_url, base().as_str());
    }

    #[test]
    fn unresolvable_reference_is_empty() {
        let doc = Html::parse_document(r#"<img src="http://[broken">"#);
        let imgs = extract_images(&doc, &base());
        assert_eq!(imgs[0].src, "http://[broken");
        assert_eq!(imgs[0].absolute_url, "");
    }

    #[test]
    fn links_require_href() {
        let doc = Html::parse_document(
            r#"<a name="top">anchor</a>
               <a href="../guide"> Guide </a>
               <a href="mailto:docs@example.com">Mail</a>"#,
        );
        let links = extract_links(&doc, &base());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "Guide");
        assert_eq!(links[0].href, "../guide");
        assert_eq!(links[0].absolute_url, "https://create.roblox.com/docs/tutorials/guide");
        assert_eq!(links[1].absolute_url, "mailto:docs@example.com");
    }

    #[test]
    fn fragment_links_resolve_against_page() {
        let doc = Html::parse_document(r##"<a href="#toolbox">Toolbox</a>"##);
        let links = extract_links(&doc, &base());
        assert_eq!(
            links[0].absolute_url,
            "https://create.roblox.com/docs/tutorials/studio/explore-ui#toolbox"
        );
    }
}
