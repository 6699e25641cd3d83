// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::Value;

use crate::{CollectionKind, Record, integral_value, stringify};

/// How a query is compared against one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Case-insensitive substring of the stringified value.
    Text,
    /// Exact integer equality; a non-numeric query matches nothing.
    Integer,
    /// Case-insensitive equality of the whole value.
    Exact,
    /// Array of strings; any element containing the query matches.
    TextList,
    /// Array of objects; any element whose named text fields contain the
    /// query matches.
    NestedText { fields: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl SearchField {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
        }
    }

    const fn with_kind(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }
}

const HOTEL_FIELDS: [SearchField; 10] = [
    SearchField::text("hotel_id", "Hotel ID"),
    SearchField::text("hotel_name", "Hotel Name"),
    SearchField::text("city", "City"),
    SearchField::text("address", "Address"),
    SearchField::text("phone_number", "Phone Number"),
    SearchField::text("email", "Email"),
    SearchField::text("website", "Website"),
    SearchField::with_kind("star_rating", "Star Rating", FieldKind::Integer),
    SearchField::text("description", "Description"),
    SearchField::with_kind(
        "hotel_packages",
        "Packages",
        FieldKind::NestedText {
            fields: &["package_name", "package_description"],
        },
    ),
];

const DESTINATION_FIELDS: [SearchField; 11] = [
    SearchField::text("destination_id", "Destination ID"),
    SearchField::text("destination_name", "Destination Name"),
    SearchField::text("location", "Location"),
    SearchField::with_kind("climate", "Climate", FieldKind::Exact),
    SearchField::with_kind("destination_rating", "Rating", FieldKind::Integer),
    SearchField::text("destination_description", "Description"),
    SearchField::with_kind("popular_attractions", "Attractions", FieldKind::TextList),
    SearchField::text("best_time_to_visit", "Best Time to Visit"),
    SearchField::text("travel_tips", "Travel Tips"),
    SearchField::with_kind(
        "accommodation_options",
        "Accommodations",
        FieldKind::TextList,
    ),
    SearchField::with_kind("activities", "Activities", FieldKind::TextList),
];

const USER_FIELDS: [SearchField; 5] = [
    SearchField::text("full_name", "Full Name"),
    SearchField::text("email", "Email"),
    SearchField::text("contact", "Contact"),
    SearchField::text("address", "Address"),
    SearchField::text("gender", "Gender"),
];

impl CollectionKind {
    /// Fields a query may be scoped to, in menu order.
    pub const fn search_fields(self) -> &'static [SearchField] {
        match self {
            Self::Hotels => &HOTEL_FIELDS,
            Self::Destinations => &DESTINATION_FIELDS,
            Self::Users => &USER_FIELDS,
        }
    }
}

/// The selected search field of one collection. Holding an index into the
/// collection's allow-list means a criterion can never name an unlisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCriterion {
    collection: CollectionKind,
    index: usize,
}

impl SearchCriterion {
    pub fn default_for(collection: CollectionKind) -> Self {
        Self::parse(collection, collection.default_search_key())
            .unwrap_or(Self { collection, index: 0 })
    }

    pub fn parse(collection: CollectionKind, key: &str) -> Option<Self> {
        collection
            .search_fields()
            .iter()
            .position(|field| field.key == key)
            .map(|index| Self { collection, index })
    }

    pub fn collection(self) -> CollectionKind {
        self.collection
    }

    pub fn field(self) -> &'static SearchField {
        &self.collection.search_fields()[self.index]
    }

    pub fn key(self) -> &'static str {
        self.field().key
    }

    pub fn next(self) -> Self {
        self.rotate(1)
    }

    pub fn prev(self) -> Self {
        self.rotate(-1)
    }

    fn rotate(self, delta: isize) -> Self {
        let len = self.collection.search_fields().len() as isize;
        let index = (self.index as isize + delta).rem_euclid(len) as usize;
        Self { index, ..self }
    }
}

pub fn matches(record: &Record, field: &SearchField, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let Some(value) = record.field(field.key) else {
        return false;
    };

    let needle = query.to_lowercase();
    match field.kind {
        FieldKind::Text => contains_folded(&stringify(value), &needle),
        FieldKind::Integer => match (integral_value(value), parse_integer_query(query)) {
            (Some(actual), Some(wanted)) => actual == wanted,
            _ => false,
        },
        FieldKind::Exact => stringify(value).to_lowercase() == needle,
        FieldKind::TextList => value.as_array().is_some_and(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .any(|item| contains_folded(item, &needle))
        }),
        FieldKind::NestedText { fields } => value.as_array().is_some_and(|items| {
            items.iter().any(|item| {
                fields.iter().any(|key| {
                    item.get(*key)
                        .and_then(Value::as_str)
                        .is_some_and(|text| contains_folded(text, &needle))
                })
            })
        }),
    }
}

/// Records matching `query` on `field`, in source order. The source slice is
/// never reordered or modified.
pub fn filter<'a>(records: &'a [Record], field: &SearchField, query: &str) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| matches(record, field, query))
        .collect()
}

fn parse_integer_query(query: &str) -> Option<i64> {
    query.trim().parse().ok()
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}
