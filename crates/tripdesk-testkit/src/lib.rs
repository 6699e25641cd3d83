// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde_json::{Value, json};
use tripdesk_app::{CollectionKind, Record, RecordId};

const HOTEL_ADJECTIVES: [&str; 10] = [
    "Lake View", "Palm Bay", "Golden Sands", "Misty Hills", "Coral Reef", "Tea Garden", "Lotus",
    "Sunrise", "Heritage", "Jungle Edge",
];
const HOTEL_SUFFIXES: [&str; 5] = ["Hotel", "Resort", "Inn", "Lodge", "Retreat"];

const CITIES: [&str; 10] = [
    "Colombo",
    "Kandy",
    "Galle",
    "Ella",
    "Nuwara Eliya",
    "Trincomalee",
    "Negombo",
    "Mirissa",
    "Sigiriya",
    "Jaffna",
];
const STREET_NAMES: [&str; 8] = [
    "Lake Rd",
    "Temple St",
    "Beach Rd",
    "Hill St",
    "Station Rd",
    "Fort Lane",
    "Main St",
    "Garden Ave",
];

const PACKAGE_NAMES: [&str; 8] = [
    "Honeymoon",
    "Family Fun",
    "Weekend Escape",
    "Wellness Retreat",
    "Adventure Seeker",
    "Culture Trail",
    "Beach Bliss",
    "Business Stay",
];
const PACKAGE_SUMMARIES: [&str; 6] = [
    "Sunset dinner by the water",
    "Guided tour with local hosts",
    "Two nights with late checkout",
    "Daily spa session included",
    "Kids stay and eat free",
    "Airport pickup and drop",
];
const INCLUSIONS: [&str; 8] = [
    "Breakfast",
    "Dinner",
    "Spa",
    "Airport Transfer",
    "City Tour",
    "Wi-Fi",
    "Pool Access",
    "Safari Ride",
];

const DESTINATIONS: [(&str, &str); 10] = [
    ("Ella", "Badulla"),
    ("Sigiriya", "Matale"),
    ("Mirissa", "Matara"),
    ("Yala", "Hambantota"),
    ("Kandy", "Kandy"),
    ("Galle Fort", "Galle"),
    ("Nuwara Eliya", "Nuwara Eliya"),
    ("Arugam Bay", "Ampara"),
    ("Anuradhapura", "Anuradhapura"),
    ("Knuckles Range", "Matale"),
];
const CLIMATES: [&str; 4] = ["Tropical", "Cool", "Dry", "Humid"];
const ATTRACTIONS: [&str; 10] = [
    "Nine Arches Bridge",
    "Lion Rock",
    "Whale Watching",
    "Temple of the Tooth",
    "Dutch Fort",
    "Tea Estates",
    "Leopard Safari",
    "Surf Point",
    "Ancient Stupas",
    "Waterfalls",
];
const ACCOMMODATIONS: [&str; 5] = ["Boutique Hotel", "Homestay", "Eco Lodge", "Villa", "Hostel"];
const ACTIVITIES: [&str; 8] = [
    "Hiking",
    "Surfing",
    "Birdwatching",
    "Cycling",
    "Snorkeling",
    "Cooking Class",
    "Train Ride",
    "Rock Climbing",
];
const SEASONS: [&str; 5] = ["Jan-Apr", "Dec-Mar", "May-Sep", "Year round", "Jun-Aug"];
const TIPS: [&str; 5] = [
    "Start early to beat the heat.",
    "Carry cash for small vendors.",
    "Book trains a week ahead.",
    "Dress modestly at temples.",
    "Pack a light rain jacket.",
];

const FIRST_NAMES: [&str; 12] = [
    "Nimal", "Kasuni", "Ruwan", "Dilani", "Sahan", "Ishara", "Tharindu", "Nadeesha", "Amaya",
    "Chamara", "Hiruni", "Lahiru",
];
const LAST_NAMES: [&str; 10] = [
    "Perera",
    "Fernando",
    "Silva",
    "Jayasinghe",
    "Bandara",
    "Wickramasinghe",
    "Dissanayake",
    "Gunawardena",
    "Herath",
    "Rajapaksha",
];
const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of booking-API shaped records. The same seed always
/// produces the same records, ids included.
#[derive(Debug, Clone)]
pub struct TravelFaker {
    rng: DeterministicRng,
    seed: u64,
    serial: u64,
}

impl TravelFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            serial: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn hotel(&mut self) -> Value {
        let serial = self.next_serial();
        let name = format!(
            "{} {}",
            self.pick(&HOTEL_ADJECTIVES),
            self.pick(&HOTEL_SUFFIXES)
        );
        let city = self.pick(&CITIES);
        let slug = name.to_ascii_lowercase().replace(' ', "");
        let package_count = self.int_n(4);
        let packages = (0..package_count)
            .map(|_| self.package())
            .collect::<Vec<_>>();

        json!({
            "_id": self.object_id(serial),
            "hotel_id": format!("H{serial:03}"),
            "hotel_name": name,
            "city": city,
            "address": format!("{} {}, {city}", self.int_range(1, 250), self.pick(&STREET_NAMES)),
            "phone_number": self.phone(),
            "email": format!("stay@{slug}.lk"),
            "website": format!("https://www.{slug}.lk"),
            "star_rating": self.int_range(1, 5),
            "description": format!("A {} stay in {city}.", self.pick(&["quiet", "lively", "family friendly", "luxury"])),
            "hotel_packages": packages,
        })
    }

    pub fn destination(&mut self) -> Value {
        let serial = self.next_serial();
        let (name, location) = self.pick(&DESTINATIONS);
        json!({
            "_id": self.object_id(serial),
            "destination_id": format!("D{serial:03}"),
            "destination_name": name,
            "location": location,
            "climate": self.pick(&CLIMATES),
            "destination_rating": self.int_range(1, 5),
            "destination_description": format!("{name} in the {location} district."),
            "popular_attractions": self.pick_many(&ATTRACTIONS, 3),
            "accommodation_options": self.pick_many(&ACCOMMODATIONS, 2),
            "activities": self.pick_many(&ACTIVITIES, 3),
            "best_time_to_visit": self.pick(&SEASONS),
            "travel_tips": self.pick(&TIPS),
        })
    }

    pub fn user(&mut self) -> Value {
        let serial = self.next_serial();
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        json!({
            "_id": self.object_id(serial),
            "full_name": format!("{first} {last}"),
            "email": format!("{}.{}@tripdesk.lk", first.to_ascii_lowercase(), last.to_ascii_lowercase()),
            "contact": self.phone(),
            "address": format!("{} {}, {}", self.int_range(1, 250), self.pick(&STREET_NAMES), self.pick(&CITIES)),
            "dob": format!(
                "{}-{:02}-{:02}",
                self.int_range(1960, 2004),
                self.int_range(1, 12),
                self.int_range(1, 28)
            ),
            "gender": self.pick(&GENDERS),
        })
    }

    pub fn value(&mut self, kind: CollectionKind) -> Value {
        match kind {
            CollectionKind::Hotels => self.hotel(),
            CollectionKind::Destinations => self.destination(),
            CollectionKind::Users => self.user(),
        }
    }

    pub fn records(&mut self, kind: CollectionKind, count: usize) -> Vec<Record> {
        (0..count)
            .filter_map(|_| Record::from_value(self.value(kind)))
            .collect()
    }

    fn package(&mut self) -> Value {
        json!({
            "package_name": self.pick(&PACKAGE_NAMES),
            "package_description": self.pick(&PACKAGE_SUMMARIES),
            "price": self.int_range(50, 900),
            "validity_period": format!(
                "{REFERENCE_YEAR}-{:02}-{:02}",
                self.int_range(1, 12),
                self.int_range(1, 28)
            ),
            "inclusions": self.pick_many(&INCLUSIONS, 3),
        })
    }

    fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    /// 24 hex characters, like the ids the booking API hands out.
    fn object_id(&self, serial: u64) -> String {
        format!("{:012x}{:012x}", self.seed & 0xFFFF_FFFF_FFFF, serial)
    }

    fn phone(&mut self) -> String {
        format!(
            "07{}-{:03}-{:04}",
            self.int_range(0, 8),
            self.int_range(0, 999),
            self.int_range(0, 9_999)
        )
    }

    fn pick<T: Copy>(&mut self, values: &[T]) -> T {
        values[self.int_n(values.len())]
    }

    fn pick_many(&mut self, values: &[&str], max: usize) -> Vec<String> {
        let count = self.int_n(max + 1);
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            let value = self.pick(values).to_owned();
            if !picked.contains(&value) {
                picked.push(value);
            }
        }
        picked
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        min + self.int_n((max - min + 1) as usize) as i64
    }
}

/// In-memory stand-in for the booking API used by `--demo`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoData {
    pub hotels: Vec<Record>,
    pub destinations: Vec<Record>,
    pub users: Vec<Record>,
}

impl DemoData {
    pub fn generate(seed: u64) -> Self {
        let mut faker = TravelFaker::new(seed);
        Self {
            hotels: faker.records(CollectionKind::Hotels, 24),
            destinations: faker.records(CollectionKind::Destinations, 14),
            users: faker.records(CollectionKind::Users, 9),
        }
    }

    pub fn records(&self, kind: CollectionKind) -> &[Record] {
        match kind {
            CollectionKind::Hotels => &self.hotels,
            CollectionKind::Destinations => &self.destinations,
            CollectionKind::Users => &self.users,
        }
    }

    pub fn remove(&mut self, kind: CollectionKind, id: &RecordId) -> bool {
        let records = match kind {
            CollectionKind::Hotels => &mut self.hotels,
            CollectionKind::Destinations => &mut self.destinations,
            CollectionKind::Users => &mut self.users,
        };
        let before = records.len();
        records.retain(|record| record.id() != id);
        records.len() != before
    }
}

/// Builds records from literal JSON objects. Fails on the first element that
/// has no id.
pub fn records_from_json(values: impl IntoIterator<Item = Value>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match Record::from_value(value) {
            Some(record) => records.push(record),
            None => bail!("fixture record {index} has no _id or id"),
        }
    }
    Ok(records)
}

/// Three hand-written hotels covering packages, missing fields and ratings.
pub fn sample_hotels() -> Vec<Record> {
    fixture(vec![
        json!({
            "_id": "h1",
            "hotel_id": "H001",
            "hotel_name": "Lake View Hotel",
            "city": "Kandy",
            "address": "12 Lake Rd, Kandy",
            "phone_number": "071-555-0101",
            "email": "stay@lakeview.lk",
            "website": "https://www.lakeview.lk",
            "star_rating": 4,
            "description": "Overlooks the lake.",
            "hotel_packages": [
                {
                    "package_name": "Honeymoon",
                    "package_description": "Sunset dinner",
                    "price": 450,
                    "validity_period": "2026-06-30",
                    "inclusions": ["Breakfast", "Spa"],
                }
            ],
        }),
        json!({
            "_id": "h2",
            "hotel_id": "H002",
            "hotel_name": "Palm Bay Resort",
            "city": "Galle",
            "phone_number": "077-555-0202",
            "star_rating": 5,
            "hotel_packages": [],
        }),
        json!({
            "_id": "h3",
            "hotel_id": "H003",
            "hotel_name": "Misty Hills Inn",
            "city": "Nuwara Eliya",
            "star_rating": 3,
        }),
    ])
}

pub fn sample_destinations() -> Vec<Record> {
    fixture(vec![
        json!({
            "_id": "d1",
            "destination_id": "D001",
            "destination_name": "Ella",
            "location": "Badulla",
            "climate": "Cool",
            "destination_rating": 5,
            "popular_attractions": ["Nine Arches Bridge", "Little Adam's Peak"],
            "activities": ["Hiking"],
            "best_time_to_visit": "Jan-Apr",
        }),
        json!({
            "_id": "d2",
            "destination_id": "D002",
            "destination_name": "Mirissa",
            "location": "Matara",
            "climate": "Tropical",
            "destination_rating": 4,
            "popular_attractions": ["Whale Watching"],
        }),
    ])
}

pub fn sample_users() -> Vec<Record> {
    fixture(vec![
        json!({
            "_id": "u1",
            "full_name": "Nimal Perera",
            "email": "nimal@tripdesk.lk",
            "contact": "071-555-0303",
            "gender": "Male",
        }),
        json!({
            "_id": "u2",
            "full_name": "Kasuni Silva",
            "email": "kasuni@tripdesk.lk",
            "gender": "Female",
        }),
    ])
}

fn fixture(values: Vec<Value>) -> Vec<Record> {
    values.into_iter().filter_map(Record::from_value).collect()
}
