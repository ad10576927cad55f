// src/pipeline/state.rs
use std::collections::HashSet;
use std::fmt;

use crate::types::{ClassifiedNewsItem, RawNewsItem};

/// Points of the fixed flow. `Persisted` and `Notified` are independent branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    Fetched,
    CacheChecked,
    Classified,
    Persisted,
    Notified,
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "start",
            Stage::Fetched => "fetched",
            Stage::CacheChecked => "cache_checked",
            Stage::Classified => "classified",
            Stage::Persisted => "persisted",
            Stage::Notified => "notified",
            Stage::End => "end",
        };
        f.write_str(s)
    }
}

/// Everything the run has learned so far. Each step reads it and hands back a
/// [`StateUpdate`]; fields are only ever filled in, never rewritten by a later step.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub raw_items: Vec<RawNewsItem>,
    pub cached_ids: HashSet<String>,
    pub cache_hits: usize,
    pub unseen_items: Vec<RawNewsItem>,
    pub classified_items: Vec<ClassifiedNewsItem>,
    pub persisted: bool,
    pub notified: bool,
    /// Stages reached, in completion order.
    pub stages: Vec<Stage>,
}

/// Partial update returned by a step. `None` leaves the field untouched; an update
/// with every field `None` means the step contributed nothing.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub raw_items: Option<Vec<RawNewsItem>>,
    pub cached_ids: Option<HashSet<String>>,
    pub cache_hits: Option<usize>,
    pub unseen_items: Option<Vec<RawNewsItem>>,
    pub classified_items: Option<Vec<ClassifiedNewsItem>>,
    pub persisted: Option<bool>,
    pub notified: Option<bool>,
}

impl StateUpdate {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_items.is_none()
            && self.cached_ids.is_none()
            && self.cache_hits.is_none()
            && self.unseen_items.is_none()
            && self.classified_items.is_none()
            && self.persisted.is_none()
            && self.notified.is_none()
    }

    pub fn raw_items(items: Vec<RawNewsItem>) -> Self {
        Self {
            raw_items: Some(items),
            ..Self::default()
        }
    }

    pub fn cache_checked(
        cached_ids: HashSet<String>,
        cache_hits: usize,
        unseen_items: Vec<RawNewsItem>,
    ) -> Self {
        Self {
            cached_ids: Some(cached_ids),
            cache_hits: Some(cache_hits),
            unseen_items: Some(unseen_items),
            ..Self::default()
        }
    }

    pub fn classified(items: Vec<ClassifiedNewsItem>) -> Self {
        Self {
            classified_items: Some(items),
            ..Self::default()
        }
    }

    pub fn persisted(ok: bool) -> Self {
        Self {
            persisted: Some(ok),
            ..Self::default()
        }
    }

    pub fn notified(ok: bool) -> Self {
        Self {
            notified: Some(ok),
            ..Self::default()
        }
    }
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            stages: vec![Stage::Start],
            ..Self::default()
        }
    }

    /// Merge a step's update and record that `stage` was reached.
    pub fn advance(&mut self, stage: Stage, update: StateUpdate) {
        if let Some(v) = update.raw_items {
            self.raw_items = v;
        }
        if let Some(v) = update.cached_ids {
            self.cached_ids = v;
        }
        if let Some(v) = update.cache_hits {
            self.cache_hits = v;
        }
        if let Some(v) = update.unseen_items {
            self.unseen_items = v;
        }
        if let Some(v) = update.classified_items {
            self.classified_items = v;
        }
        if let Some(v) = update.persisted {
            self.persisted = v;
        }
        if let Some(v) = update.notified {
            self.notified = v;
        }
        self.stages.push(stage);
    }
}
