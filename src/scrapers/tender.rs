//! Detail-page field extraction.
//!
//! Each field has its own rule over the parsed page. Rules are
//! independent: a missing anchor point leaves that one field unset and
//! the rest untouched, so structural drift in one section of a page
//! never blocks the others.

use scraper::{ElementRef, Html, Selector};

use crate::models::TenderRecord;

/// Marker used when the organizer is hidden behind the registration wall.
const ORGANIZER_HIDDEN: &str = "Доступно после регистрации";

/// Prefix the site puts in front of every tender heading.
const TITLE_PREFIX: &str = "Тендер: ";

const RESTRICTIONS_PREFIX: &str = "Ограничения и запреты: ";

/// Extract a tender record from a detail page.
///
/// Total: any input yields a record. Title and source URL are always
/// set; everything else depends on what the page carries.
pub fn extract_tender(html: &str, url: &str) -> TenderRecord {
    let document = Html::parse_document(html);

    let mut record = TenderRecord {
        title: Some(extract_title(&document, url)),
        url: Some(url.to_string()),
        ..Default::default()
    };

    let body_sel = Selector::parse("div.tender-body").unwrap();
    let Some(body) = document.select(&body_sel).next() else {
        return record;
    };

    record.starting_price = extract_price(body);
    record.delivery_place = extract_delivery_place(body);
    record.organizer = extract_organizer(body);
    record.deadline = extract_deadline(body);
    record.placement_method = extract_placement_method(body);
    record.requirements = extract_requirements(body);
    record.sector = extract_sector(body);
    record.source_links = extract_source_links(body);

    record
}

fn extract_title(document: &Html, url: &str) -> String {
    let h1_sel = Selector::parse("h1").unwrap();
    let mut title = match document.select(&h1_sel).next() {
        Some(heading) => flat_text(heading),
        None => url.rsplit('/').next().unwrap_or(url).to_string(),
    };
    if let Some(stripped) = title.strip_prefix(TITLE_PREFIX) {
        title = stripped.to_string();
    }
    title
}

fn extract_price(body: ElementRef) -> Option<i64> {
    let text = text_after_label(body, "Начальная цена")?;
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

fn extract_delivery_place(body: ElementRef) -> Option<String> {
    let field = field_after_label(body, "Место поставки")?;

    let part_sel = Selector::parse("span.tender-info__text").unwrap();
    let parts: Vec<String> = field.select(&part_sel).map(flat_text).collect();
    let mut value = parts.join(", ");

    let link_sel = Selector::parse("a.tender-body__text").unwrap();
    if let Some(link) = field.select(&link_sel).next() {
        value.push_str(" , ");
        value.push_str(&flat_text(link));
    }

    (!value.is_empty()).then_some(value)
}

fn extract_organizer(body: ElementRef) -> Option<String> {
    let text = text_after_label(body, "Организатор закупки")?;
    if text.to_lowercase().contains("доступно после") {
        Some(ORGANIZER_HIDDEN.to_string())
    } else {
        Some(text)
    }
}

fn extract_deadline(body: ElementRef) -> Option<String> {
    let field = field_after_label(body, "Окончание (МСК)")?;

    let date_sel = Selector::parse("span.black").unwrap();
    let countdown_sel = Selector::parse("span.tender__countdown-container").unwrap();

    let date = field.select(&date_sel).next().map(flat_text)?;
    let deadline = match field.select(&countdown_sel).next() {
        Some(countdown) => format!("{} {}", date, flat_text(countdown)),
        None => date,
    };
    (!deadline.is_empty()).then_some(deadline)
}

fn extract_placement_method(body: ElementRef) -> Option<String> {
    let label = find_label(body, |text| {
        text.to_lowercase().contains("способ размещения")
    })?;
    let field = next_sibling_span(label)?;

    // Both element children and bare text nodes count.
    let mut parts: Vec<String> = Vec::new();
    for child in field.children() {
        let text = match ElementRef::wrap(child) {
            Some(element) => flat_text(element),
            None => match child.value().as_text() {
                Some(text) => text.trim().to_string(),
                None => continue,
            },
        };
        if !text.is_empty() {
            parts.push(text);
        }
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn extract_requirements(body: ElementRef) -> Option<String> {
    let field = field_after_label(body, "Ограничения и запреты")?;

    let li_sel = Selector::parse("li").unwrap();
    let items: Vec<ElementRef> = field.select(&li_sel).collect();
    let rendered = if items.is_empty() {
        flat_text(field)
    } else {
        items
            .iter()
            .enumerate()
            .map(|(i, li)| format!("{}. {}", i + 1, flat_text(*li)))
            .collect::<Vec<_>>()
            .join(" ")
    };
    (!rendered.is_empty()).then(|| format!("{RESTRICTIONS_PREFIX}{rendered}"))
}

fn extract_sector(body: ElementRef) -> Option<String> {
    let label = find_label(body, |text| text.contains("Отрасль"))?;
    let block = enclosing_with_class(label, "tender-body__block")?;
    let next_block = next_sibling_with_class(block, "tender-body__block")?;

    let field_sel = Selector::parse("span.tender-body__field").unwrap();
    let field = next_block.select(&field_sel).next()?;

    let li_sel = Selector::parse("li").unwrap();
    let a_sel = Selector::parse("a").unwrap();
    let mut sectors = Vec::new();
    for (i, li) in field.select(&li_sel).enumerate() {
        if let Some(link) = li.select(&a_sel).next() {
            sectors.push(format!("{}. {}", i + 1, normalize_ws(&flat_text(link))));
        }
    }
    (!sectors.is_empty()).then(|| sectors.join(", "))
}

fn extract_source_links(body: ElementRef) -> Option<String> {
    let label = find_label(body, |text| text.contains("Ссылки на источники"))?;
    let block = label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div" && has_class(*el, "tender-body__block"))?;

    let field_sel = Selector::parse("span.tender-body__field").unwrap();
    let field = block.select(&field_sel).next()?;
    let text = flat_text(field);
    (!text.is_empty()).then_some(text)
}

/// Collapse any run of whitespace to a single space.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flattened text of an element: descendant text nodes trimmed and
/// space-joined.
fn flat_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find a label `span` in `scope`: a span without element children
/// whose trimmed text satisfies `pred`.
fn find_label<'a>(scope: ElementRef<'a>, pred: impl Fn(&str) -> bool) -> Option<ElementRef<'a>> {
    let span_sel = Selector::parse("span").unwrap();
    scope
        .select(&span_sel)
        .filter(|el| el.children().all(|c| ElementRef::wrap(c).is_none()))
        .find(|el| pred(&flat_text(*el)))
}

/// The value `span` directly following a label span.
fn next_sibling_span(label: ElementRef) -> Option<ElementRef> {
    label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "span")
}

fn field_after_label<'a>(scope: ElementRef<'a>, label: &str) -> Option<ElementRef<'a>> {
    let span = find_label(scope, |text| text == label)?;
    next_sibling_span(span)
}

/// Non-empty flattened text of the field following a label.
fn text_after_label(scope: ElementRef, label: &str) -> Option<String> {
    let text = field_after_label(scope, label).map(flat_text)?;
    (!text.is_empty()).then_some(text)
}

fn has_class(element: ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn enclosing_with_class<'a>(element: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| has_class(*el, class))
}

fn next_sibling_with_class<'a>(element: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| has_class(*el, class))
}
