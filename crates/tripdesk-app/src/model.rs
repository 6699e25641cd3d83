// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{Record, RecordId, format_display_date, integral_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Hotels,
    Destinations,
    Users,
}

impl CollectionKind {
    pub const ALL: [Self; 3] = [Self::Hotels, Self::Destinations, Self::Users];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hotels => "hotels",
            Self::Destinations => "destinations",
            Self::Users => "users",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hotels" | "hotel" => Some(Self::Hotels),
            "destinations" | "destination" => Some(Self::Destinations),
            "users" | "user" => Some(Self::Users),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hotels => "Hotels List",
            Self::Destinations => "Destinations List",
            Self::Users => "Users",
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            Self::Hotels => "hotel",
            Self::Destinations => "destination",
            Self::Users => "user",
        }
    }

    /// Key some backends wrap the array under instead of returning it bare.
    pub const fn wrapper_key(self) -> &'static str {
        self.as_str()
    }

    pub const fn list_path(self) -> &'static str {
        match self {
            Self::Hotels => "/hotel/get-hotels",
            Self::Destinations => "/destination/get-destinations",
            Self::Users => "/user/users",
        }
    }

    pub fn delete_path(self, id: &RecordId) -> String {
        match self {
            Self::Hotels => format!("/hotel/delete-hotel/{id}"),
            Self::Destinations => format!("/destination/delete-destination/{id}"),
            Self::Users => format!("/user/delete-user/{id}"),
        }
    }

    pub const fn default_search_key(self) -> &'static str {
        match self {
            Self::Hotels => "hotel_id",
            Self::Destinations => "destination_id",
            Self::Users => "full_name",
        }
    }

    /// Field used when a record has to be named in a prompt or status line.
    pub const fn name_key(self) -> &'static str {
        match self {
            Self::Hotels => "hotel_name",
            Self::Destinations => "destination_name",
            Self::Users => "full_name",
        }
    }

    pub fn record_label(self, record: &Record) -> String {
        let name = record.text(self.name_key());
        if name.is_empty() {
            record.id().to_string()
        } else {
            name
        }
    }

    pub const fn table_columns(self) -> &'static [TableColumn] {
        match self {
            Self::Hotels => &HOTEL_COLUMNS,
            Self::Destinations => &DESTINATION_COLUMNS,
            Self::Users => &USER_COLUMNS,
        }
    }

    pub const fn report_columns(self) -> &'static [TableColumn] {
        match self {
            Self::Hotels => &HOTEL_REPORT_COLUMNS,
            Self::Destinations => &DESTINATION_REPORT_COLUMNS,
            Self::Users => &USER_REPORT_COLUMNS,
        }
    }

    pub fn next(self) -> Self {
        rotate(self, 1)
    }

    pub fn prev(self) -> Self {
        rotate(self, -1)
    }
}

fn rotate(kind: CollectionKind, delta: isize) -> CollectionKind {
    let all = CollectionKind::ALL;
    let current = all.iter().position(|item| *item == kind).unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(all.len() as isize) as usize;
    all[next]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Integer 0..=5 drawn as stars.
    Rating,
    /// Length of an array field.
    Count,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

impl TableColumn {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: ColumnKind::Text,
        }
    }

    const fn with_kind(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self { key, label, kind }
    }

    pub fn cell(&self, record: &Record) -> String {
        match self.kind {
            ColumnKind::Text => record.text(self.key),
            ColumnKind::Rating => record
                .field(self.key)
                .and_then(integral_value)
                .map(format_stars)
                .unwrap_or_default(),
            ColumnKind::Count => record.list(self.key).len().to_string(),
            ColumnKind::Date => record
                .field(self.key)
                .and_then(|value| value.as_str())
                .map(format_display_date)
                .unwrap_or_default(),
        }
    }
}

pub const MAX_RATING: i64 = 5;

pub fn format_stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

const HOTEL_COLUMNS: [TableColumn; 6] = [
    TableColumn::text("hotel_id", "Hotel ID"),
    TableColumn::text("hotel_name", "Hotel Name"),
    TableColumn::text("city", "City"),
    TableColumn::text("phone_number", "Phone"),
    TableColumn::with_kind("star_rating", "Rating", ColumnKind::Rating),
    TableColumn::with_kind("hotel_packages", "Packages", ColumnKind::Count),
];

const DESTINATION_COLUMNS: [TableColumn; 6] = [
    TableColumn::text("destination_id", "ID"),
    TableColumn::text("destination_name", "Name"),
    TableColumn::text("location", "Location"),
    TableColumn::text("climate", "Climate"),
    TableColumn::with_kind("destination_rating", "Rating", ColumnKind::Rating),
    TableColumn::text("best_time_to_visit", "Best Time"),
];

const USER_COLUMNS: [TableColumn; 6] = [
    TableColumn::text("full_name", "Full Name"),
    TableColumn::text("email", "Email"),
    TableColumn::text("contact", "Contact"),
    TableColumn::text("address", "Address"),
    TableColumn::with_kind("dob", "Date of Birth", ColumnKind::Date),
    TableColumn::text("gender", "Gender"),
];

const HOTEL_REPORT_COLUMNS: [TableColumn; 6] = [
    TableColumn::text("hotel_id", "Hotel ID"),
    TableColumn::text("hotel_name", "Hotel Name"),
    TableColumn::text("city", "City"),
    TableColumn::text("phone_number", "Phone Number"),
    TableColumn::text("website", "Website"),
    TableColumn::text("star_rating", "Star Rating"),
];

const DESTINATION_REPORT_COLUMNS: [TableColumn; 6] = [
    TableColumn::text("destination_id", "Destination ID"),
    TableColumn::text("destination_name", "Destination Name"),
    TableColumn::text("location", "Location"),
    TableColumn::text("climate", "Climate"),
    TableColumn::text("destination_rating", "Rating"),
    TableColumn::text("best_time_to_visit", "Best Time to Visit"),
];

const USER_REPORT_COLUMNS: [TableColumn; 5] = [
    TableColumn::text("full_name", "Full Name"),
    TableColumn::text("email", "Email"),
    TableColumn::text("contact", "Contact"),
    TableColumn::text("address", "Address"),
    TableColumn::text("gender", "Gender"),
];

#[cfg(test)]
mod tests {
    use super::{CollectionKind, format_stars};
    use crate::{Record, RecordId};
    use serde_json::json;

    #[test]
    fn parse_accepts_singular_and_plural_names() {
        assert_eq!(CollectionKind::parse("Hotels"), Some(CollectionKind::Hotels));
        assert_eq!(
            CollectionKind::parse("destination"),
            Some(CollectionKind::Destinations)
        );
        assert_eq!(CollectionKind::parse(" users "), Some(CollectionKind::Users));
        assert_eq!(CollectionKind::parse("bookings"), None);
    }

    #[test]
    fn collection_rotation_wraps() {
        assert_eq!(CollectionKind::Users.next(), CollectionKind::Hotels);
        assert_eq!(CollectionKind::Hotels.prev(), CollectionKind::Users);
    }

    #[test]
    fn delete_paths_embed_record_id() {
        let id = RecordId::from("65f1c0");
        assert_eq!(
            CollectionKind::Hotels.delete_path(&id),
            "/hotel/delete-hotel/65f1c0"
        );
        assert_eq!(
            CollectionKind::Destinations.delete_path(&id),
            "/destination/delete-destination/65f1c0"
        );
        assert_eq!(
            CollectionKind::Users.delete_path(&id),
            "/user/delete-user/65f1c0"
        );
    }

    #[test]
    fn stars_are_clamped_to_five() {
        assert_eq!(format_stars(3), "★★★☆☆");
        assert_eq!(format_stars(9), "★★★★★");
        assert_eq!(format_stars(-1), "☆☆☆☆☆");
    }

    #[test]
    fn hotel_columns_render_rating_and_package_count() {
        let record = Record::from_value(json!({
            "_id": "h1",
            "hotel_name": "Grand Hotel",
            "star_rating": 4,
            "hotel_packages": [{"package_name": "Spa"}, {"package_name": "Golf"}],
        }))
        .expect("record");

        let cells = CollectionKind::Hotels
            .table_columns()
            .iter()
            .map(|column| column.cell(&record))
            .collect::<Vec<_>>();
        assert_eq!(cells, vec!["", "Grand Hotel", "", "", "★★★★☆", "2"]);
    }

    #[test]
    fn record_label_falls_back_to_id() {
        let record = Record::from_value(json!({"_id": "u9"})).expect("record");
        assert_eq!(CollectionKind::Users.record_label(&record), "u9");
    }
}
