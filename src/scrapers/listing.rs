//! Field extraction for a single `sold-property-listing` fragment.
//!
//! Each direct child of a fragment is a block tagged by its `class`
//! attribute. Blocks are handled independently and fill in a draft record;
//! the draft becomes a `PriceRecord` once every block has been seen.

use crate::models::PriceRecord;
use chrono::NaiveDate;
use scraper::ElementRef;
use tracing::debug;

const NBSP: char = '\u{a0}';
const SOLD_MARKER: &str = "Såld";

const ADDRESS_CLASS: &str = "item-result-meta-attribute-is-bold item-link qa-selling-price-title";
const FEE_CLASS: &str = "sold-property-listing__fee";
const LAND_AREA_CLASS: &str = "sold-property-listing__land-area sold-property-listing--left";
const SUPPLEMENTAL_AREA_CLASS: &str =
    "sold-property-listing__supplemental-area sold-property-listing--left";

/// A required element was not found in the fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

/// Why a parsed listing is left out of the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Living size missing, zero or negative
    NoLivingSize,
    /// Listing shows a monthly fee line
    Fee,
    /// A required value was present but could not be read
    Unparseable(&'static str),
}

#[derive(Debug, PartialEq)]
pub enum Extracted {
    Record(PriceRecord),
    Excluded(Exclusion),
}

/// The block kinds found under a listing fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Location,
    Size,
    Price,
    PriceChange,
}

impl Block {
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "sold-property-listing__location" => Some(Self::Location),
            "sold-property-listing__size" => Some(Self::Size),
            "sold-property-listing__price" => Some(Self::Price),
            "sold-property-listing__price-change" => Some(Self::PriceChange),
            _ => None,
        }
    }

    fn handler(self) -> fn(ElementRef, &mut Draft) -> Result<(), MissingField> {
        match self {
            Self::Location => location_block,
            Self::Size => size_block,
            Self::Price => price_block,
            Self::PriceChange => price_change_block,
        }
    }
}

#[derive(Debug, Default)]
struct Draft {
    address: Option<String>,
    area: Option<String>,
    city: Option<String>,
    living_size: Option<f64>,
    rooms: f64,
    yard_size: Option<f64>,
    bi_size: Option<f64>,
    price: Option<f64>,
    sold_at: Option<NaiveDate>,
    price_change: Option<f64>,
    excluded: Option<Exclusion>,
}

impl Draft {
    fn exclude(&mut self, reason: Exclusion) {
        self.excluded.get_or_insert(reason);
    }

    fn finish(self) -> Result<Extracted, MissingField> {
        let address = self.address.ok_or(MissingField("address"))?;
        if let Some(reason) = self.excluded {
            return Ok(Extracted::Excluded(reason));
        }

        let Some(living_size) = self.living_size else {
            return Ok(Extracted::Excluded(Exclusion::NoLivingSize));
        };
        let price = self.price.ok_or(MissingField("price"))?;
        let sold_at = self.sold_at.ok_or(MissingField("sale date"))?;

        Ok(Extracted::Record(PriceRecord {
            address,
            area: self.area,
            city: self.city,
            living_size,
            rooms: self.rooms,
            yard_size: self.yard_size,
            bi_size: self.bi_size,
            price,
            sold_at,
            price_change: self.price_change,
        }))
    }
}

/// Extract one listing fragment into a record, or the reason it is skipped
pub fn extract_listing(fragment: ElementRef) -> Result<Extracted, MissingField> {
    let mut draft = Draft::default();

    for child in child_elements(fragment) {
        let Some(block) = child.value().attr("class").and_then(Block::from_class) else {
            continue;
        };
        (block.handler())(child, &mut draft)?;
    }

    draft.finish()
}

fn location_block(el: ElementRef, draft: &mut Draft) -> Result<(), MissingField> {
    let address = child(el, "h2", None)
        .and_then(|h2| child(h2, "span", Some(ADDRESS_CLASS)))
        .ok_or(MissingField("address"))?;
    draft.address = Some(inner_text(address).trim().to_string());

    if let Some(div) = child(el, "div", None) {
        draft.area = child(div, "span", Some("item-link"))
            .map(|span| inner_text(span).replace(',', "").trim().to_string())
            .filter(|area| !area.is_empty());
        draft.city = last_text(div);
    }

    Ok(())
}

fn size_block(el: ElementRef, draft: &mut Draft) -> Result<(), MissingField> {
    let clear = child(el, "div", Some("clear-children"));

    let compound = clear.and_then(|clear| {
        child_elements(clear)
            .filter(|div| div.value().name() == "div")
            .find_map(last_text)
    });

    if let Some(compound) = compound {
        let tokens: Vec<&str> = compound.split(NBSP).collect();
        if tokens.len() == 4 {
            match parse_number(tokens[0]) {
                Some(size) if size > 0.0 => draft.living_size = Some(size),
                Some(_) => {}
                None => draft.exclude(Exclusion::Unparseable("living size")),
            }
            draft.rooms = parse_number(tokens[2]).unwrap_or_default();
        }
    }

    if draft.living_size.is_none() {
        draft.exclude(Exclusion::NoLivingSize);
        return Ok(());
    }

    if clear.and_then(|clear| child(clear, "div", Some(FEE_CLASS))).is_some() {
        draft.exclude(Exclusion::Fee);
        return Ok(());
    }

    draft.yard_size =
        child(el, "div", Some(LAND_AREA_CLASS)).and_then(|div| leading_area(div, "yard size"));
    draft.bi_size = child(el, "div", Some(SUPPLEMENTAL_AREA_CLASS))
        .and_then(|div| leading_area(div, "supplemental area"));

    Ok(())
}

fn price_block(el: ElementRef, draft: &mut Draft) -> Result<(), MissingField> {
    let mut divs = child_elements(el).filter(|div| div.value().name() == "div");
    let price_line = divs.next().and_then(|div| child(div, "span", None));
    let date_line = divs.next();

    let price_line = price_line.ok_or(MissingField("price"))?;
    let price_text = inner_text(price_line).replace(NBSP, "");
    draft.price = price_text.split_whitespace().nth(1).and_then(parse_number);
    if draft.price.is_none() {
        draft.exclude(Exclusion::Unparseable("price"));
    }

    let date_line = date_line.ok_or(MissingField("sale date"))?;
    draft.sold_at = after_marker(&inner_text(date_line))
        .and_then(|text| parse_swedish_date(text).or_else(|| parse_short_date(text)))
        .or_else(|| {
            let nested = child(date_line, "div", None)?;
            let text = inner_text(nested);
            parse_neutral_date(after_marker(&text).unwrap_or(text.as_str()))
        });
    if draft.sold_at.is_none() {
        draft.exclude(Exclusion::Unparseable("sale date"));
    }

    Ok(())
}

fn price_change_block(el: ElementRef, draft: &mut Draft) -> Result<(), MissingField> {
    let text = inner_text(el).replace([NBSP, '%'], "");
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }

    draft.price_change = parse_number(text);
    if draft.price_change.is_none() {
        debug!("Ignoring unreadable price change '{}'", text);
    }
    Ok(())
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// First direct child with the given tag and, if given, exact class attribute
fn child<'a>(el: ElementRef<'a>, tag: &str, class: Option<&str>) -> Option<ElementRef<'a>> {
    child_elements(el).find(|c| {
        c.value().name() == tag
            && class.map_or(true, |class| c.value().attr("class") == Some(class))
    })
}

fn inner_text(el: ElementRef) -> String {
    el.text().collect()
}

/// Last direct text node of an element, trimmed
fn last_text(el: ElementRef) -> Option<String> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .last()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn leading_area(el: ElementRef, field: &str) -> Option<f64> {
    let text = inner_text(el);
    let area = text.trim().split(NBSP).next().and_then(parse_number);
    if area.is_none() {
        debug!("Ignoring unreadable {} '{}'", field, text.trim());
    }
    area
}

fn after_marker(text: &str) -> Option<&str> {
    text.find(SOLD_MARKER).map(|pos| text[pos + SOLD_MARKER.len()..].trim())
}

/// Parse a number written the Swedish way: "1 250", "54,5", "−3,2"
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            ',' => '.',
            '\u{2212}' => '-',
            c => c,
        })
        .collect();
    cleaned.parse().ok().filter(|n: &f64| n.is_finite())
}

const SWEDISH_MONTHS: [&str; 12] = [
    "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti", "september",
    "oktober", "november", "december",
];

/// "12 mars 2019" or "3 okt. 2020"
pub fn parse_swedish_date(text: &str) -> Option<NaiveDate> {
    let text = text.replace(NBSP, " ");
    let mut tokens = text.split_whitespace();
    let day: u32 = tokens.next()?.parse().ok()?;
    let month = tokens.next()?.trim_end_matches('.').to_lowercase();
    let year: i32 = tokens.next()?.parse().ok()?;

    let month = SWEDISH_MONTHS.iter().position(|name| {
        *name == month || (month.chars().count() >= 3 && name.starts_with(&month))
    })?;

    NaiveDate::from_ymd_opt(year, month as u32 + 1, day)
}

/// Swedish short date, "2021-06-05", at the start of the text
fn parse_short_date(text: &str) -> Option<NaiveDate> {
    let first = text.split_whitespace().next()?;
    NaiveDate::parse_from_str(first, "%Y-%m-%d").ok()
}

fn parse_neutral_date(text: &str) -> Option<NaiveDate> {
    let text = text.replace(NBSP, " ");
    let text = text.trim();
    ["%Y-%m-%d", "%d %B %Y", "%B %d, %Y", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
