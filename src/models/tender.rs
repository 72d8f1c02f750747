//! Extracted tender records.

use serde::{Deserialize, Serialize};

/// Column captions of the output table, as the source site names them.
pub mod columns {
    pub const TITLE: &str = "Тендер";
    pub const URL: &str = "Ссылка";
    pub const STARTING_PRICE: &str = "Начальная цена, руб.";
    pub const DELIVERY_PLACE: &str = "Место поставки";
    pub const ORGANIZER: &str = "Организатор закупки";
    pub const DEADLINE: &str = "Окончание";
    pub const PLACEMENT_METHOD: &str = "Способ размещения";
    pub const REQUIREMENTS: &str = "Требования и преимущества";
    pub const SECTOR: &str = "Отрасль";
    pub const SOURCE_LINKS: &str = "Ссылки на источники";
}

/// One tender, as extracted from its detail page.
///
/// Every field is optional: a missing or reshaped section on the page
/// leaves its own field unset without affecting the others. A record
/// with no fields at all stands for a tender whose page could not be
/// fetched; it is still counted in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub starting_price: Option<i64>,
    pub delivery_place: Option<String>,
    pub organizer: Option<String>,
    pub deadline: Option<String>,
    pub placement_method: Option<String>,
    pub requirements: Option<String>,
    pub sector: Option<String>,
    pub source_links: Option<String>,
}

impl TenderRecord {
    /// Record for a tender whose page never yielded any data.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Column caption and rendered value for every populated field, in
    /// declaration order. The writer derives the table schema from this.
    pub fn present_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.title {
            fields.push((columns::TITLE, v.clone()));
        }
        if let Some(v) = &self.url {
            fields.push((columns::URL, v.clone()));
        }
        if let Some(v) = self.starting_price {
            fields.push((columns::STARTING_PRICE, v.to_string()));
        }
        if let Some(v) = &self.delivery_place {
            fields.push((columns::DELIVERY_PLACE, v.clone()));
        }
        if let Some(v) = &self.organizer {
            fields.push((columns::ORGANIZER, v.clone()));
        }
        if let Some(v) = &self.deadline {
            fields.push((columns::DEADLINE, v.clone()));
        }
        if let Some(v) = &self.placement_method {
            fields.push((columns::PLACEMENT_METHOD, v.clone()));
        }
        if let Some(v) = &self.requirements {
            fields.push((columns::REQUIREMENTS, v.clone()));
        }
        if let Some(v) = &self.sector {
            fields.push((columns::SECTOR, v.clone()));
        }
        if let Some(v) = &self.source_links {
            fields.push((columns::SOURCE_LINKS, v.clone()));
        }
        fields
    }
}
