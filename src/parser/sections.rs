use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::element_text;
use crate::model::{ContentBlock, Section};

static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

/// Build one section per heading from the sibling elements that follow it.
///
/// Siblings are consumed until the next heading of any rank. Headings with
/// nothing collected are dropped.
pub fn extract(doc: &Html) -> Vec<Section> {
    doc.select(&HEADINGS)
        .filter_map(|heading| {
            let level = heading_level(&heading)?;
            let content = collect_content(&heading);
            if content.is_empty() {
                return None;
            }
            Some(Section {
                level,
                title: element_text(&heading),
                content,
            })
        })
        .collect()
}

fn collect_content(heading: &ElementRef) -> Vec<ContentBlock> {
    let mut content = Vec::new();

    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        if heading_level(&sibling).is_some() {
            break;
        }
        match sibling.value().name() {
            "p" => content.push(ContentBlock::Paragraph {
                text: element_text(&sibling),
            }),
            "ul" | "ol" => content.push(ContentBlock::List {
                items: sibling.select(&LIST_ITEM).map(|li| element_text(&li)).collect(),
            }),
            // tables are collected at the document level
            _ => {}
        }
    }

    content
}

fn heading_level(el: &ElementRef) -> Option<u8> {
    match el.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

// ── Tests ──
