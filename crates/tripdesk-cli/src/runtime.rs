// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info};
use tripdesk_api::Client;
use tripdesk_app::{CollectionKind, Record, RecordId, Route};
use tripdesk_testkit::DemoData;
use tripdesk_tui::{AppRuntime, InternalEvent};

/// Talks to the booking API. Fetches and deletes run on a worker thread with
/// a clone of the client so the interface keeps drawing.
pub struct ApiRuntime {
    client: Client,
    console_base_url: String,
}

impl ApiRuntime {
    pub fn new(client: Client, console_base_url: &str) -> Self {
        Self {
            client,
            console_base_url: console_base_url.to_owned(),
        }
    }
}

impl AppRuntime for ApiRuntime {
    fn fetch_records(&mut self, kind: CollectionKind) -> Result<Vec<Record>> {
        self.client.fetch_records(kind)
    }

    fn delete_record(&mut self, kind: CollectionKind, id: &RecordId) -> Result<()> {
        self.client.delete_record(kind, id)
    }

    fn open_route(&mut self, route: &Route) -> Result<()> {
        open_console_url(&route.url(&self.console_base_url))
    }

    fn end_session(&mut self) {
        self.client.set_token(None);
    }

    fn spawn_fetch(
        &mut self,
        request_id: u64,
        kind: CollectionKind,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("fetch-{}", kind.as_str()))
            .spawn(move || {
                let result = client
                    .fetch_records(kind)
                    .map_err(|error| format!("{error:#}"));
                let _ = tx.send(InternalEvent::FetchCompleted {
                    request_id,
                    kind,
                    result,
                });
            })
            .context("spawn fetch worker")?;
        Ok(())
    }

    fn spawn_delete(
        &mut self,
        request_id: u64,
        kind: CollectionKind,
        id: RecordId,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("delete-{}", kind.singular()))
            .spawn(move || {
                let result = client
                    .delete_record(kind, &id)
                    .map_err(|error| format!("{error:#}"));
                let _ = tx.send(InternalEvent::DeleteCompleted {
                    request_id,
                    kind,
                    id,
                    result,
                });
            })
            .context("spawn delete worker")?;
        Ok(())
    }
}

fn open_console_url(url: &str) -> Result<()> {
    info!(url, "opening web console");
    open::that(url).with_context(|| format!("open {url} in the system browser"))
}

/// Serves generated records from memory for `--demo`. Deletes succeed
/// locally; console routes are not opened.
pub struct DemoRuntime {
    data: DemoData,
}

impl DemoRuntime {
    pub fn new(data: DemoData) -> Self {
        Self { data }
    }

    pub fn records(&self, kind: CollectionKind) -> &[Record] {
        self.data.records(kind)
    }
}

impl AppRuntime for DemoRuntime {
    fn fetch_records(&mut self, kind: CollectionKind) -> Result<Vec<Record>> {
        debug!(collection = kind.as_str(), "serving demo records");
        Ok(self.data.records(kind).to_vec())
    }

    fn delete_record(&mut self, kind: CollectionKind, id: &RecordId) -> Result<()> {
        if !self.data.remove(kind, id) {
            return Err(anyhow!("{} {id} not found", kind.singular()));
        }
        Ok(())
    }

    fn open_route(&mut self, route: &Route) -> Result<()> {
        bail!("demo mode has no web console for {}", route.path())
    }
}
