//! Ruleset record - one game system or content pack.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{DependencyEdge, DependencyKind, RulesetStatus, RulesetType};
use crate::RulesetId;

/// Default schema version for newly created rulesets.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

/// A ruleset and its outgoing dependency edges.
///
/// Status changes go through [`RulesetGraph`](super::RulesetGraph) so that
/// eligibility is always checked against the rest of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    // Identity
    id: RulesetId,
    name: String,
    description: Option<String>,
    ruleset_type: RulesetType,
    status: RulesetStatus,

    // Version and compatibility
    edition: Option<String>,
    compatibility_version: Option<String>,
    content_path: String,
    schema_version: String,

    // Relationships
    dependencies: Vec<DependencyEdge>,

    // Capabilities and metadata
    features: Vec<String>,
    supported_content_types: Vec<String>,
    tags: Vec<String>,
    license: Option<String>,

    // Content statistics
    content_counts: BTreeMap<String, u32>,
    last_content_update: Option<DateTime<Utc>>,

    // Timestamps
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ruleset {
    pub fn new(
        name: impl Into<String>,
        ruleset_type: RulesetType,
        content_path: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RulesetId::new(),
            name: name.into(),
            description: None,
            ruleset_type,
            status: RulesetStatus::Draft,
            edition: None,
            compatibility_version: None,
            content_path: content_path.into(),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            dependencies: Vec::new(),
            features: Vec::new(),
            supported_content_types: Vec::new(),
            tags: Vec::new(),
            license: None,
            content_counts: BTreeMap::new(),
            last_content_update: None,
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_id(mut self, id: RulesetId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the stored status directly, e.g. when loading from persistence.
    pub fn with_status(mut self, status: RulesetStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    pub fn with_compatibility_version(mut self, version: impl Into<String>) -> Self {
        self.compatibility_version = Some(version.into());
        self
    }

    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_supported_content_types(mut self, types: Vec<String>) -> Self {
        self.supported_content_types = types;
        self
    }

    pub fn with_dependency(mut self, edge: DependencyEdge) -> Self {
        self.dependencies.push(edge);
        self
    }

    pub fn requires(self, target: RulesetId) -> Self {
        self.with_dependency(DependencyEdge::new(target, DependencyKind::Required))
    }

    pub fn conflicts_with(self, target: RulesetId) -> Self {
        self.with_dependency(DependencyEdge::new(target, DependencyKind::Conflicts))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> RulesetId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn ruleset_type(&self) -> RulesetType {
        self.ruleset_type
    }

    #[inline]
    pub fn status(&self) -> RulesetStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == RulesetStatus::Active
    }

    #[inline]
    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    /// Blank versions read as unset.
    #[inline]
    pub fn compatibility_version(&self) -> Option<&str> {
        self.compatibility_version
            .as_deref()
            .filter(|version| !version.trim().is_empty())
    }

    #[inline]
    pub fn content_path(&self) -> &str {
        &self.content_path
    }

    #[inline]
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    #[inline]
    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    #[inline]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[inline]
    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    /// Outgoing edges of one kind.
    pub fn edges(&self, kind: DependencyKind) -> impl Iterator<Item = &DependencyEdge> {
        self.dependencies.iter().filter(move |edge| edge.kind == kind)
    }

    /// True when this ruleset declares a `conflicts` edge to `other`.
    pub fn declares_conflict_with(&self, other: RulesetId) -> bool {
        self.edges(DependencyKind::Conflicts)
            .any(|edge| edge.target == other)
    }

    #[inline]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    #[inline]
    pub fn supported_content_types(&self) -> &[String] {
        &self.supported_content_types
    }

    #[inline]
    pub fn content_counts(&self) -> &BTreeMap<String, u32> {
        &self.content_counts
    }

    #[inline]
    pub fn last_content_update(&self) -> Option<DateTime<Utc>> {
        self.last_content_update
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Features and Content
    // =========================================================================

    /// Add a feature name; duplicates are ignored.
    pub fn add_feature(&mut self, feature: impl Into<String>) {
        let feature = feature.into();
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
    }

    pub fn remove_feature(&mut self, feature: &str) {
        self.features.retain(|f| f != feature);
    }

    /// Case-insensitive feature lookup.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features
            .iter()
            .any(|f| f.eq_ignore_ascii_case(feature))
    }

    /// Case-insensitive content type lookup.
    pub fn supports_content_type(&self, content_type: &str) -> bool {
        self.supported_content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
    }

    pub fn add_content(&mut self, content_type: impl Into<String>, count: u32, now: DateTime<Utc>) {
        let entry = self.content_counts.entry(content_type.into()).or_insert(0);
        *entry = entry.saturating_add(count);
        self.last_content_update = Some(now);
    }

    /// Decrease a content count, never below zero.
    pub fn remove_content(&mut self, content_type: &str, count: u32, now: DateTime<Utc>) {
        if let Some(entry) = self.content_counts.get_mut(content_type) {
            *entry = entry.saturating_sub(count);
            self.last_content_update = Some(now);
        }
    }

    pub fn content_count(&self, content_type: &str) -> u32 {
        self.content_counts.get(content_type).copied().unwrap_or(0)
    }

    pub fn total_content_count(&self) -> u32 {
        self.content_counts
            .values()
            .fold(0u32, |total, count| total.saturating_add(*count))
    }

    pub(super) fn set_status(&mut self, status: RulesetStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
