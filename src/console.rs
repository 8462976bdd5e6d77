//! The admin console: a generic list + form state machine over any
//! configured resource.
//!
//! Two states: browsing (no item selected, the form is a blank create form)
//! and editing (an item loaded into the form). Submitting, clearing, or
//! switching resource returns to browsing. Every successful mutation
//! triggers a full list reload; there is no optimistic local patching, so
//! the view is briefly stale during the round trip and then consistent.
//!
//! All I/O goes through the `Gateway` seam and the `SettingsStore` seam, so
//! the whole machine runs against fakes in tests.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::api::{ApiRequest, Gateway};
use crate::form::{
    build_payload, empty_form_for, format_field_value, parse_array_input, payload_has_file,
    to_json_object, to_multipart, FormState, FormValue,
};
use crate::schema::{resource_by_key, resource_configs, FieldKind, ResourceConfig};
use crate::settings::{Settings, SettingsStore, TableSettings, Theme};

/// A record from a related resource, resolved for relation/multi-select
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    /// An existing item, by id, is loaded into the form.
    Editing(i64),
}

pub struct AdminConsole {
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn SettingsStore>,
    settings: Settings,
    resource: &'static ResourceConfig,
    items: Vec<Value>,
    related: HashMap<&'static str, Vec<RelatedOption>>,
    form: FormState,
    mode: Mode,
    pending_delete: Option<i64>,
    error: Option<String>,
    toasts: VecDeque<String>,
}

impl AdminConsole {
    pub fn new(gateway: Arc<dyn Gateway>, store: Arc<dyn SettingsStore>) -> Self {
        let settings = store.load().unwrap_or_default();
        let resource = &resource_configs()[0];
        Self {
            gateway,
            store,
            settings,
            resource,
            items: Vec::new(),
            related: HashMap::new(),
            form: empty_form_for(resource.fields),
            mode: Mode::Browsing,
            pending_delete: None,
            error: None,
            toasts: VecDeque::new(),
        }
    }

    pub fn resource(&self) -> &'static ResourceConfig {
        self.resource
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn table_prefs(&self) -> TableSettings {
        self.settings.table(self.resource.key)
    }

    pub fn related_options(&self, field_name: &str) -> &[RelatedOption] {
        self.related
            .get(field_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn drain_toasts(&mut self) -> Vec<String> {
        self.toasts.drain(..).collect()
    }

    /// Switch the active resource: reset the form, drop stale rows, reload
    /// the list and the related options. Returns false for an unknown key.
    pub async fn select_resource(&mut self, key: &str) -> bool {
        let Some(resource) = resource_by_key(key) else {
            return false;
        };
        self.resource = resource;
        self.items.clear();
        self.related.clear();
        self.reset_form();
        self.reload().await;
        true
    }

    /// Refetch the current resource's list and related options.
    pub async fn reload(&mut self) {
        self.error = None;
        let request = ApiRequest::get(format!("{}/", self.resource.endpoint));
        match self.gateway.execute(request).await {
            Ok(Some(Value::Array(items))) => self.items = items,
            Ok(_) => self.items = Vec::new(),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.load_related().await;
    }

    async fn load_related(&mut self) {
        for field in self.resource.fields {
            let Some(endpoint) = field.options_endpoint else {
                continue;
            };
            let label_key = field.option_label.unwrap_or("name");
            let request = ApiRequest::get(format!("{endpoint}/"));
            match self.gateway.execute(request).await {
                Ok(Some(Value::Array(records))) => {
                    let options = records
                        .iter()
                        .filter_map(|record| {
                            let id = record.get("id").and_then(Value::as_i64)?;
                            let label = record
                                .get(label_key)
                                .and_then(Value::as_str)
                                .map(str::to_string)
                                .unwrap_or_else(|| id.to_string());
                            Some(RelatedOption { id, label })
                        })
                        .collect();
                    self.related.insert(field.name, options);
                }
                Ok(_) => {}
                Err(e) => {
                    // Options are display sugar; the id inputs still work.
                    log::warn!("failed to load {endpoint} options: {e}");
                }
            }
        }
    }

    /// Start a blank create form. No-op for resources that cannot create.
    pub fn start_create(&mut self) -> bool {
        if !self.resource.capabilities.create {
            return false;
        }
        self.reset_form();
        true
    }

    /// Discard edits and return to browsing.
    pub fn clear(&mut self) {
        self.reset_form();
    }

    /// Load an item into the form for editing. Returns false when the id is
    /// not in the current list.
    pub fn start_edit(&mut self, id: i64) -> bool {
        let Some(item) = self.find_item(id).cloned() else {
            return false;
        };
        let mut form = empty_form_for(self.resource.fields);
        for field in self.resource.fields {
            let wire = item.get(field.name).unwrap_or(&Value::Null);
            form.insert(field.name, format_field_value(field, wire));
        }
        self.form = form;
        self.mode = Mode::Editing(id);
        self.pending_delete = None;
        self.error = None;
        true
    }

    /// Set one form field from user input, parsed per the field kind.
    pub fn set_field(&mut self, name: &str, input: &str) -> Result<(), String> {
        let Some(field) = self.resource.field(name) else {
            return Err(format!("Unknown field: {name}"));
        };
        if field.read_only {
            return Err(format!("{} is server-assigned", field.label));
        }
        let value = match field.kind {
            FieldKind::Checkbox => FormValue::Flag(parse_flag(input)?),
            FieldKind::File => {
                if input.is_empty() {
                    FormValue::FileRef(None)
                } else {
                    let path = PathBuf::from(input);
                    if !path.is_file() {
                        return Err(format!("No such file: {input}"));
                    }
                    FormValue::FileRef(Some(path))
                }
            }
            FieldKind::MultiSelect => FormValue::IdList(parse_array_input(input)),
            FieldKind::Text
            | FieldKind::Number
            | FieldKind::Textarea
            | FieldKind::Select
            | FieldKind::Array
            | FieldKind::Relation => FormValue::Text(input.to_string()),
        };
        self.form.insert(field.name, value);
        Ok(())
    }

    /// Save the form: POST for create, PUT for a JSON update, and multipart
    /// POST/PATCH when any field holds a file (PATCH because a partial
    /// multipart update is the safe default). On success the form clears and
    /// the list reloads; on failure the form stays intact for correction.
    pub async fn submit(&mut self) {
        self.error = None;
        let payload = build_payload(self.resource.fields, &self.form);
        let has_file = payload_has_file(&payload);
        let editing = matches!(self.mode, Mode::Editing(_));

        let request = match self.mode {
            Mode::Editing(id) => {
                let path = format!("{}/{}/", self.resource.endpoint, id);
                if has_file {
                    ApiRequest::multipart(Method::PATCH, path, to_multipart(&payload))
                } else {
                    ApiRequest::json(Method::PUT, path, to_json_object(&payload))
                }
            }
            Mode::Browsing => {
                if !self.resource.capabilities.create {
                    return;
                }
                let path = format!("{}/", self.resource.endpoint);
                if has_file {
                    ApiRequest::multipart(Method::POST, path, to_multipart(&payload))
                } else {
                    ApiRequest::json(Method::POST, path, to_json_object(&payload))
                }
            }
        };

        match self.gateway.execute(request).await {
            Ok(_) => {
                let action = if editing { "updated" } else { "created" };
                self.toasts
                    .push_back(format!("{} {}", self.resource.title, action));
                self.reset_form();
                self.reload().await;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Arm a delete. Nothing is sent until `confirm_delete`. Returns false
    /// when deletion is disabled or the id is unknown.
    pub fn request_delete(&mut self, id: i64) -> bool {
        if !self.resource.capabilities.delete {
            return false;
        }
        if self.find_item(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Issue the armed DELETE.
    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        self.error = None;
        let request = ApiRequest::delete(format!("{}/{}/", self.resource.endpoint, id));
        match self.gateway.execute(request).await {
            Ok(_) => {
                self.toasts.push_back("Item deleted".to_string());
                if self.mode == Mode::Editing(id) {
                    self.reset_form();
                }
                self.reload().await;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn toggle_column(&mut self, name: &str) -> bool {
        if self.resource.field(name).is_none() {
            return false;
        }
        self.settings.table_mut(self.resource.key).toggle_column(name);
        self.persist_settings();
        true
    }

    pub fn set_column_width(&mut self, name: &str, width: u16) -> bool {
        if self.resource.field(name).is_none() {
            return false;
        }
        self.settings
            .table_mut(self.resource.key)
            .set_width(name, width);
        self.persist_settings();
        true
    }

    pub fn toggle_options_panel(&mut self) {
        let table = self.settings.table_mut(self.resource.key);
        table.show_table_options = !table.show_table_options;
        self.persist_settings();
    }

    pub fn toggle_compact(&mut self) {
        self.settings.sidebar_compact = !self.settings.sidebar_compact;
        self.persist_settings();
    }

    pub fn set_sidebar_width(&mut self, width: u16) {
        self.settings.set_sidebar_width(width);
        self.persist_settings();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist_settings();
    }

    fn reset_form(&mut self) {
        self.form = empty_form_for(self.resource.fields);
        self.mode = Mode::Browsing;
        self.pending_delete = None;
    }

    fn find_item(&self, id: i64) -> Option<&Value> {
        self.items
            .iter()
            .find(|item| item.get("id").and_then(Value::as_i64) == Some(id))
    }

    fn persist_settings(&self) {
        if let Err(e) = self.store.save(&self.settings) {
            log::warn!("failed to persist settings: {e}");
        }
    }
}

fn parse_flag(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("Expected yes or no, got: {other}")),
    }
}
