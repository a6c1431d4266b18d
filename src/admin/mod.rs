//! Declarative admin registrations and the registry that holds them.
//!
//! A [`ModelAdmin`] says how staff see a model: which columns the change list
//! shows, what can be searched and filtered, how the change form is grouped
//! and which fields are read-only. The JSON admin API interprets these.

pub mod query;
pub mod registrations;

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Change-list page size when a registration does not set one.
pub const DEFAULT_LIST_PER_PAGE: u64 = 100;

/// A titled group of fields on a change or add form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Fieldset {
    pub name: Option<&'static str>,
    pub fields: Vec<&'static str>,
    /// Presentation hints such as `collapse` or `wide`
    pub classes: Vec<&'static str>,
}

impl Fieldset {
    pub fn new(name: Option<&'static str>, fields: &[&'static str]) -> Self {
        Self {
            name,
            fields: fields.to_vec(),
            classes: Vec::new(),
        }
    }

    pub fn classes(mut self, classes: &[&'static str]) -> Self {
        self.classes = classes.to_vec();
        self
    }
}

/// How one model is presented to staff.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelAdmin {
    pub app_label: &'static str,
    pub model_name: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub list_display: Vec<&'static str>,
    pub list_filter: Vec<&'static str>,
    pub search_fields: Vec<&'static str>,
    /// Default ordering; a leading `-` means descending
    pub ordering: Vec<&'static str>,
    pub fieldsets: Vec<Fieldset>,
    pub readonly_fields: Vec<&'static str>,
    pub add_fieldsets: Vec<Fieldset>,
    pub list_per_page: u64,
}

impl ModelAdmin {
    /// A registration with framework defaults: the change list shows the
    /// record's display string and nothing is searchable or filterable.
    pub fn new(
        app_label: &'static str,
        model_name: &'static str,
        verbose_name: &'static str,
        verbose_name_plural: &'static str,
    ) -> Self {
        Self {
            app_label,
            model_name,
            verbose_name,
            verbose_name_plural,
            list_display: vec!["__str__"],
            list_filter: Vec::new(),
            search_fields: Vec::new(),
            ordering: Vec::new(),
            fieldsets: Vec::new(),
            readonly_fields: Vec::new(),
            add_fieldsets: Vec::new(),
            list_per_page: DEFAULT_LIST_PER_PAGE,
        }
    }

    /// Registry key, e.g. `accounts.userprofile`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }

    pub fn is_readonly(&self, field: &str) -> bool {
        self.readonly_fields.contains(&field)
    }

    /// Every field shown on the change form, in fieldset order.
    pub fn form_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fieldsets.iter().flat_map(|fs| fs.fields.iter().copied())
    }

    /// Fields staff may edit on the change form.
    pub fn editable_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.form_fields().filter(|f| !self.is_readonly(f))
    }

    pub fn add_form_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.add_fieldsets
            .iter()
            .flat_map(|fs| fs.fields.iter().copied())
    }

    /// Ordering is limited to the change-list columns.
    pub fn is_sortable(&self, field: &str) -> bool {
        field != "__str__" && self.list_display.contains(&field)
    }
}

/// Registry of model admins keyed by `app_label.model_name`.
#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    registry: BTreeMap<String, ModelAdmin>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model. Registering the same model twice is an error.
    pub fn register(&mut self, admin: ModelAdmin) -> AppResult<()> {
        let key = admin.key();
        if self.registry.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "The model {} is already registered",
                key
            )));
        }
        self.registry.insert(key, admin);
        Ok(())
    }

    pub fn get(&self, app_label: &str, model_name: &str) -> Option<&ModelAdmin> {
        self.registry.get(&format!("{}.{}", app_label, model_name))
    }

    pub fn is_registered(&self, app_label: &str, model_name: &str) -> bool {
        self.get(app_label, model_name).is_some()
    }

    /// Registered admins in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelAdmin> {
        self.registry.values()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
