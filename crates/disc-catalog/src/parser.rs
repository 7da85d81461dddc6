use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{DiscCategory, DiscRecord, FieldValue, ManufacturerRef, ProductRef};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required element: {0}")]
    MissingElement(String),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub element_tag: &'static str,
    pub locator_id: &'static str,
    pub label: Option<&'static str>,
    pub attr: Option<&'static str>,
    pub coerce: fn(&str) -> Option<FieldValue>,
}

pub fn coerce_text(text: &str) -> Option<FieldValue> {
    (!text.is_empty()).then(|| FieldValue::Text(text.to_string()))
}

pub fn coerce_number(text: &str) -> Option<FieldValue> {
    text.parse::<f64>().ok().map(FieldValue::Number)
}

const fn field(
    key: &'static str,
    element_tag: &'static str,
    locator_id: &'static str,
    label: Option<&'static str>,
    coerce: fn(&str) -> Option<FieldValue>,
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        element_tag,
        locator_id,
        label,
        attr: None,
        coerce,
    }
}

const fn attr_field(
    key: &'static str,
    element_tag: &'static str,
    locator_id: &'static str,
    attr: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        element_tag,
        locator_id,
        label: None,
        attr: Some(attr),
        coerce: coerce_text,
    }
}

pub static DISC_FIELDS: &[FieldDescriptor] = &[
    field("name", "h1", "ContentPlaceHolder1_lblDiscName", None, coerce_text),
    field("diameter", "li", "ContentPlaceHolder1_lblDiameter", Some("Diameter:"), coerce_text),
    field("height", "li", "ContentPlaceHolder1_lblHeight", Some("Height:"), coerce_text),
    field("rim_depth", "li", "ContentPlaceHolder1_lblRimDepth", Some("Rim Depth:"), coerce_text),
    field("rim_width", "li", "ContentPlaceHolder1_lblRimWidth", Some("Rim Width:"), coerce_text),
    field("max_weight", "li", "ContentPlaceHolder1_lblMaxWeight", Some("Max Weight:"), coerce_text),
    field("speed", "li", "ContentPlaceHolder1_lblSpeed", Some("Speed:"), coerce_number),
    field("glide", "li", "ContentPlaceHolder1_lblGlide", Some("Glide:"), coerce_number),
    field("turn", "li", "ContentPlaceHolder1_lblTurn", Some("Turn:"), coerce_number),
    field("fade", "li", "ContentPlaceHolder1_lblFade", Some("Fade:"), coerce_number),
    field("stability_desc", "li", "ContentPlaceHolder1_lblStability", Some("Stability:"), coerce_text),
    field("bead", "li", "ContentPlaceHolder1_lblBeadless", None, coerce_text),
    field("price", "td", "ContentPlaceHolder1_lblOurPrice", None, coerce_text),
    attr_field("img", "a", "ContentPlaceHolder1_lnkDiscImage", "href"),
];

static RE_ONCLICK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*'([^']+)'").expect("invalid regex: onclick target"));

const CATEGORY_MARKER: &str = "/category/";

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract_field(document: &Html, descriptor: &FieldDescriptor) -> FieldValue {
    let Ok(selector) = Selector::parse(&format!(
        "{}#{}",
        descriptor.element_tag, descriptor.locator_id
    )) else {
        log::debug!("Bad selector for field {}", descriptor.key);
        return FieldValue::Missing;
    };

    let Some(element) = document.select(&selector).next() else {
        return FieldValue::Missing;
    };

    let text = match descriptor.attr {
        Some(attr) => match element.value().attr(attr) {
            Some(value) => value.to_string(),
            None => return FieldValue::Missing,
        },
        None => elem_text(element),
    };
    let text = text.trim();
    let text = descriptor
        .label
        .and_then(|label| text.strip_prefix(label))
        .unwrap_or(text)
        .trim();

    (descriptor.coerce)(text).unwrap_or_default()
}

pub fn parse_disc_record(html: &str, product: &ProductRef) -> DiscRecord {
    let document = Html::parse_document(html);
    let mut record = DiscRecord::new(product);

    for descriptor in DISC_FIELDS {
        record.set(descriptor.key, extract_field(&document, descriptor));
    }

    record
}

const CATALOG_OVERVIEW_LABELS: [&str; 6] = [
    "all manufacturers",
    "all brands",
    "all discs",
    "view all",
    "shop all",
    "see all",
];

fn is_catalog_overview(entry: &ManufacturerRef) -> bool {
    let name = entry.name.to_lowercase();
    CATALOG_OVERVIEW_LABELS.contains(&name.as_str())
        || entry.category_path.trim_end_matches('/').ends_with("/category")
}

fn is_top_level(li: ElementRef, menu: ElementRef) -> bool {
    !li.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| *a != menu)
        .any(|a| a.value().name() == "li")
}

pub fn parse_menu(html: &str) -> Result<Vec<ManufacturerRef>, ParseError> {
    let document = Html::parse_document(html);
    let menu_sel = Selector::parse("div#main-menu").unwrap();
    let li_sel = Selector::parse("li").unwrap();
    let a_sel = Selector::parse("a[href]").unwrap();

    let menu = document
        .select(&menu_sel)
        .next()
        .ok_or_else(|| ParseError::MissingElement("div#main-menu".into()))?;

    let mut anchors = Vec::new();
    for li in menu.select(&li_sel).filter(|li| is_top_level(*li, menu)) {
        let nested: Vec<_> = li.select(&li_sel).collect();
        if nested.is_empty() {
            anchors.extend(li.select(&a_sel).next());
        } else {
            anchors.extend(nested.iter().filter_map(|sub| sub.select(&a_sel).next()));
        }
    }

    let mut seen = HashSet::new();
    let mut manufacturers: Vec<ManufacturerRef> = anchors
        .into_iter()
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            href.contains(CATEGORY_MARKER).then(|| ManufacturerRef {
                name: normalize_whitespace(&elem_text(a)),
                category_path: href.to_string(),
            })
        })
        .filter(|m| seen.insert(m.clone()))
        .collect();

    if manufacturers.last().is_some_and(is_catalog_overview) {
        let dropped = manufacturers.pop();
        log::debug!("Dropped catalog overview entry: {:?}", dropped);
    }

    Ok(manufacturers)
}

fn parse_onclick_target(onclick: &str) -> Option<String> {
    RE_ONCLICK_TARGET
        .captures(onclick)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

fn thumbnail_link(thumbnail: ElementRef, button_sel: &Selector) -> Option<String> {
    let button = thumbnail.select(button_sel).last()?;
    let onclick = button.value().attr("onclick")?;
    parse_onclick_target(onclick)
}

pub fn scan_category_panels(html: &str) -> Vec<(DiscCategory, Vec<String>)> {
    let document = Html::parse_document(html);
    let thumb_sel = Selector::parse("div.thumbnail").unwrap();
    let button_sel = Selector::parse("button").unwrap();

    let mut panels = Vec::new();

    for category in DiscCategory::ALL {
        let Ok(panel_sel) = Selector::parse(&format!("div#{}", category.panel_id())) else {
            continue;
        };
        let Some(panel) = document.select(&panel_sel).next() else {
            continue;
        };

        let links = panel
            .select(&thumb_sel)
            .enumerate()
            .filter_map(|(i, thumb)| {
                let link = thumbnail_link(thumb, &button_sel);
                if link.is_none() {
                    log::debug!("Skipping malformed thumbnail {} in {} panel", i, category);
                }
                link
            })
            .collect();

        panels.push((category, links));
    }

    panels
}

pub fn scan_category(html: &str) -> Vec<String> {
    scan_category_panels(html)
        .into_iter()
        .flat_map(|(_, links)| links)
        .collect()
}
