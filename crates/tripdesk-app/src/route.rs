// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{CollectionKind, RecordId};

/// Web-console locations handed off to the system browser for flows this
/// console does not implement itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ViewCollection(CollectionKind),
    AddRecord(CollectionKind),
    UpdateRecord(CollectionKind, RecordId),
    Report(CollectionKind),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::ViewCollection(CollectionKind::Hotels) => "/view-hotels".to_owned(),
            Self::ViewCollection(CollectionKind::Destinations) => "/view-destination".to_owned(),
            Self::ViewCollection(CollectionKind::Users) => "/view-user".to_owned(),
            Self::AddRecord(CollectionKind::Hotels) => "/add-hotel".to_owned(),
            Self::AddRecord(CollectionKind::Destinations) => "/add-destination".to_owned(),
            Self::AddRecord(CollectionKind::Users) => "/register".to_owned(),
            Self::UpdateRecord(kind, id) => format!("/update-{}/{id}", kind.singular()),
            Self::Report(CollectionKind::Hotels) => "/hotel-report".to_owned(),
            Self::Report(CollectionKind::Destinations) => "/destination-report".to_owned(),
            Self::Report(CollectionKind::Users) => "/view-user".to_owned(),
        }
    }

    pub fn url(&self, console_base: &str) -> String {
        format!("{}{}", console_base.trim_end_matches('/'), self.path())
    }
}
