// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::num::NonZeroUsize;

use crate::{
    CollectionKind, Notification, PageState, Record, RecordId, SearchCriterion, filter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    collection: CollectionKind,
    records: Vec<Record>,
    criterion: SearchCriterion,
    query: String,
    page: PageState,
    expanded: Option<RecordId>,
    pending_delete: Option<RecordId>,
    loading: bool,
    notification: Option<Notification>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(CollectionKind::Hotels, crate::DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserCommand {
    SwitchCollection(CollectionKind),
    LoadStarted,
    Loaded(Vec<Record>),
    LoadFailed(String),
    SetQuery(String),
    PushQueryChar(char),
    PopQueryChar,
    SetCriterion(String),
    NextCriterion,
    PrevCriterion,
    NextPage,
    PrevPage,
    GoToPage(usize),
    ToggleExpand(RecordId),
    RequestDelete(RecordId),
    ConfirmDelete,
    CancelDelete,
    RecordDeleted(RecordId),
    DeleteFailed(String),
    Notify(Notification),
    ClearNotification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    CollectionChanged(CollectionKind),
    LoadingChanged(bool),
    RecordsReplaced(usize),
    QueryChanged(String),
    CriterionChanged(&'static str),
    PageChanged(usize),
    ExpandedChanged(Option<RecordId>),
    DeleteRequested(RecordId),
    /// The user confirmed; the caller must now issue the remote delete.
    DeleteConfirmed(RecordId),
    DeleteCancelled,
    RecordRemoved(RecordId),
    Notified(Notification),
    NotificationCleared,
}

impl BrowserState {
    pub fn new(collection: CollectionKind, page_size: NonZeroUsize) -> Self {
        Self {
            collection,
            records: Vec::new(),
            criterion: SearchCriterion::default_for(collection),
            query: String::new(),
            page: PageState::new(page_size),
            expanded: None,
            pending_delete: None,
            loading: false,
            notification: None,
        }
    }

    pub fn collection(&self) -> CollectionKind {
        self.collection
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn criterion(&self) -> SearchCriterion {
        self.criterion
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn expanded(&self) -> Option<&RecordId> {
        self.expanded.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn expanded_record(&self) -> Option<&Record> {
        self.expanded.as_ref().and_then(|id| self.record(id))
    }

    pub fn filtered(&self) -> Vec<&Record> {
        filter(&self.records, self.criterion.field(), &self.query)
    }

    pub fn page_rows(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        self.page.slice(&filtered).to_vec()
    }

    pub fn page_count(&self) -> usize {
        self.page.page_count(self.filtered().len())
    }

    pub fn dispatch(&mut self, command: BrowserCommand) -> Vec<BrowserEvent> {
        match command {
            BrowserCommand::SwitchCollection(kind) => self.switch_collection(kind),
            BrowserCommand::LoadStarted => {
                self.records.clear();
                self.loading = true;
                let mut events = vec![BrowserEvent::LoadingChanged(true)];
                events.extend(self.clear_expanded());
                events.extend(self.drop_vanished_pending_delete());
                events.extend(self.reset_page());
                events
            }
            BrowserCommand::Loaded(records) => {
                self.records = records;
                self.loading = false;
                let mut events = vec![
                    BrowserEvent::LoadingChanged(false),
                    BrowserEvent::RecordsReplaced(self.records.len()),
                ];
                let vanished = self
                    .expanded
                    .as_ref()
                    .is_some_and(|id| self.record(id).is_none());
                if vanished {
                    events.extend(self.clear_expanded());
                }
                events.extend(self.drop_vanished_pending_delete());
                events.extend(self.clamp_page());
                events
            }
            BrowserCommand::LoadFailed(message) => {
                self.records.clear();
                self.loading = false;
                let mut events = vec![
                    BrowserEvent::LoadingChanged(false),
                    BrowserEvent::RecordsReplaced(0),
                ];
                events.extend(self.clear_expanded());
                events.extend(self.drop_vanished_pending_delete());
                events.extend(self.reset_page());
                events.push(self.notify(Notification::load_failed(self.collection, &message)));
                events
            }
            BrowserCommand::SetQuery(query) => self.replace_query(query),
            BrowserCommand::PushQueryChar(ch) => {
                let mut query = self.query.clone();
                query.push(ch);
                self.replace_query(query)
            }
            BrowserCommand::PopQueryChar => {
                let mut query = self.query.clone();
                if query.pop().is_none() {
                    return Vec::new();
                }
                self.replace_query(query)
            }
            BrowserCommand::SetCriterion(key) => {
                match SearchCriterion::parse(self.collection, &key) {
                    Some(criterion) => self.replace_criterion(criterion),
                    None => vec![self.notify(Notification::new(
                        "Search",
                        format!("{key:?} is not searchable on {}", self.collection.as_str()),
                        crate::Severity::Warning,
                    ))],
                }
            }
            BrowserCommand::NextCriterion => self.replace_criterion(self.criterion.next()),
            BrowserCommand::PrevCriterion => self.replace_criterion(self.criterion.prev()),
            BrowserCommand::NextPage => {
                let total = self.filtered().len();
                self.page_event(|page| page.next(total))
            }
            BrowserCommand::PrevPage => {
                let total = self.filtered().len();
                self.page_event(|page| page.prev(total))
            }
            BrowserCommand::GoToPage(index) => {
                let total = self.filtered().len();
                self.page_event(|page| page.go_to(index, total))
            }
            BrowserCommand::ToggleExpand(id) => {
                if self.record(&id).is_none() {
                    return Vec::new();
                }
                self.expanded = if self.expanded.as_ref() == Some(&id) {
                    None
                } else {
                    Some(id)
                };
                vec![BrowserEvent::ExpandedChanged(self.expanded.clone())]
            }
            BrowserCommand::RequestDelete(id) => {
                if self.record(&id).is_none() {
                    return Vec::new();
                }
                self.pending_delete = Some(id.clone());
                vec![BrowserEvent::DeleteRequested(id)]
            }
            BrowserCommand::ConfirmDelete => match self.pending_delete.take() {
                Some(id) => vec![BrowserEvent::DeleteConfirmed(id)],
                None => Vec::new(),
            },
            BrowserCommand::CancelDelete => match self.pending_delete.take() {
                Some(_) => vec![BrowserEvent::DeleteCancelled],
                None => Vec::new(),
            },
            BrowserCommand::RecordDeleted(id) => {
                let before = self.records.len();
                self.records.retain(|record| record.id() != &id);
                if self.records.len() == before {
                    return Vec::new();
                }
                let mut events = vec![BrowserEvent::RecordRemoved(id.clone())];
                if self.expanded.as_ref() == Some(&id) {
                    events.extend(self.clear_expanded());
                }
                events.extend(self.clamp_page());
                events.push(self.notify(Notification::deleted(self.collection)));
                events
            }
            BrowserCommand::DeleteFailed(message) => {
                vec![self.notify(Notification::delete_failed(self.collection, &message))]
            }
            BrowserCommand::Notify(notification) => vec![self.notify(notification)],
            BrowserCommand::ClearNotification => {
                self.notification = None;
                vec![BrowserEvent::NotificationCleared]
            }
        }
    }

    fn switch_collection(&mut self, kind: CollectionKind) -> Vec<BrowserEvent> {
        self.collection = kind;
        self.records.clear();
        self.criterion = SearchCriterion::default_for(kind);
        self.query.clear();
        self.pending_delete = None;
        self.loading = true;
        let mut events = vec![
            BrowserEvent::CollectionChanged(kind),
            BrowserEvent::CriterionChanged(self.criterion.key()),
            BrowserEvent::QueryChanged(String::new()),
            BrowserEvent::LoadingChanged(true),
        ];
        events.extend(self.clear_expanded());
        events.extend(self.reset_page());
        events
    }

    fn replace_query(&mut self, query: String) -> Vec<BrowserEvent> {
        if query == self.query {
            return Vec::new();
        }
        self.query = query;
        let mut events = vec![BrowserEvent::QueryChanged(self.query.clone())];
        events.extend(self.reset_page());
        events
    }

    fn replace_criterion(&mut self, criterion: SearchCriterion) -> Vec<BrowserEvent> {
        self.criterion = criterion;
        let mut events = vec![BrowserEvent::CriterionChanged(criterion.key())];
        if !self.query.is_empty() {
            self.query.clear();
            events.push(BrowserEvent::QueryChanged(String::new()));
        }
        events.extend(self.reset_page());
        events
    }

    fn reset_page(&mut self) -> Option<BrowserEvent> {
        self.page
            .reset()
            .then_some(BrowserEvent::PageChanged(0))
    }

    fn clamp_page(&mut self) -> Option<BrowserEvent> {
        let total = self.filtered().len();
        self.page
            .clamp(total)
            .then(|| BrowserEvent::PageChanged(self.page.index()))
    }

    fn page_event(&mut self, apply: impl FnOnce(&mut PageState) -> bool) -> Vec<BrowserEvent> {
        if apply(&mut self.page) {
            vec![BrowserEvent::PageChanged(self.page.index())]
        } else {
            Vec::new()
        }
    }

    fn drop_vanished_pending_delete(&mut self) -> Option<BrowserEvent> {
        let id = self.pending_delete.as_ref()?;
        if self.record(id).is_some() {
            return None;
        }
        self.pending_delete = None;
        Some(BrowserEvent::DeleteCancelled)
    }

    fn clear_expanded(&mut self) -> Option<BrowserEvent> {
        self.expanded
            .take()
            .map(|_| BrowserEvent::ExpandedChanged(None))
    }

    fn notify(&mut self, notification: Notification) -> BrowserEvent {
        self.notification = Some(notification.clone());
        BrowserEvent::Notified(notification)
    }
}
