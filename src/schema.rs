//! Declarative per-resource field schema.
//!
//! Each manageable entity is described by a `ResourceConfig`: an endpoint,
//! a capability set, and an ordered list of `FieldDescriptor`s. Everything
//! generic in the console — zero values, display formatting, payload
//! encoding, table columns — is driven off this table, so adding a resource
//! is a config change, not a code change.

/// Input/encoding behavior of a single field. Closed set: every consumer
/// matches exhaustively, so a new kind is a compile-checked change at each
/// dispatch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Number,
    Textarea,
    Select,
    Checkbox,
    File,
    /// Comma-separated list of numeric ids, edited as free text.
    Array,
    /// Foreign id into another resource.
    Relation,
    /// Set of foreign ids into another resource.
    MultiSelect,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Textarea => "textarea",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::File => "file",
            FieldKind::Array => "array",
            FieldKind::Relation => "relation",
            FieldKind::MultiSelect => "multi-select",
        }
    }
}

/// One choice in a `Select` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Declarative description of one editable/displayable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Wire name, unique within a resource.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Server-assigned; never sent back in payloads, never editable.
    pub read_only: bool,
    /// Choices for `Select` fields.
    pub options: &'static [SelectOption],
    /// Collaborator endpoint for `Relation`/`MultiSelect` option lookups.
    pub options_endpoint: Option<&'static str>,
    /// Display key on the related item (defaults to `name`).
    pub option_label: Option<&'static str>,
    pub placeholder: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            read_only: false,
            options: &[],
            options_endpoint: None,
            option_label: None,
            placeholder: None,
        }
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub const fn with_options(mut self, options: &'static [SelectOption]) -> Self {
        self.options = options;
        self
    }

    /// Point a `Relation`/`MultiSelect` field at the resource its ids live in.
    pub const fn related_to(mut self, endpoint: &'static str, label: &'static str) -> Self {
        self.options_endpoint = Some(endpoint);
        self.option_label = Some(label);
        self
    }

    pub const fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// Which mutations the console offers for a resource. Read and update are
/// always available; restricted resources switch off create and/or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const FULL: Capabilities = Capabilities {
        create: true,
        update: true,
        delete: true,
    };

    /// Records arrive from elsewhere (the public submission path); the
    /// console can only annotate them.
    pub const RESPOND_ONLY: Capabilities = Capabilities {
        create: false,
        update: true,
        delete: false,
    };
}

/// A manageable entity exposed by the collaborator API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Unique key used for navigation and settings storage.
    pub key: &'static str,
    pub title: &'static str,
    /// REST path segment; requests go to `{base}/{endpoint}/`.
    pub endpoint: &'static str,
    pub capabilities: Capabilities,
    pub fields: &'static [FieldDescriptor],
}

impl ResourceConfig {
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const PROFICIENCY_LEVELS: &[SelectOption] = &[
    SelectOption { value: "beg", label: "Beginner" },
    SelectOption { value: "int", label: "Intermediate" },
    SelectOption { value: "adv", label: "Advanced" },
];

const RESPONSE_STATUSES: &[SelectOption] = &[
    SelectOption { value: "new", label: "New" },
    SelectOption { value: "progress", label: "In progress" },
    SelectOption { value: "responded", label: "Responded" },
];

const PROFILE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
    FieldDescriptor::new("user", "User", FieldKind::Number),
    FieldDescriptor::new("full_name", "Full name", FieldKind::Text),
    FieldDescriptor::new("bio_summary", "Bio", FieldKind::Textarea),
    FieldDescriptor::new("resume_link", "Resume link", FieldKind::Text),
    FieldDescriptor::new("profile_picture", "Profile picture", FieldKind::File),
    FieldDescriptor::new("profile_picture_url", "Picture URL", FieldKind::Text),
    FieldDescriptor::new("location", "Location", FieldKind::Text),
];

const PROJECT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
    FieldDescriptor::new("user", "Owner", FieldKind::Relation).related_to("profile", "full_name"),
    FieldDescriptor::new("title", "Title", FieldKind::Text),
    FieldDescriptor::new("description", "Description", FieldKind::Textarea),
    FieldDescriptor::new("technologies", "Technologies", FieldKind::MultiSelect)
        .related_to("technologies", "name"),
    FieldDescriptor::new("live_link", "Live link", FieldKind::Text),
    FieldDescriptor::new("github_link", "GitHub link", FieldKind::Text),
    FieldDescriptor::new("image", "Image", FieldKind::File),
    FieldDescriptor::new("display_order", "Display order", FieldKind::Number),
    FieldDescriptor::new("created_at", "Created", FieldKind::Text).read_only(),
];

const SKILL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
    FieldDescriptor::new("user", "Owner", FieldKind::Relation).related_to("profile", "full_name"),
    FieldDescriptor::new("name", "Name", FieldKind::Text),
    FieldDescriptor::new("proficiency_level", "Proficiency", FieldKind::Select)
        .with_options(PROFICIENCY_LEVELS),
    FieldDescriptor::new("category", "Category", FieldKind::Text)
        .with_placeholder("e.g., Frontend, Backend, DevOps"),
    FieldDescriptor::new("certification_url", "Certification URL", FieldKind::Text),
];

const EXPERIENCE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
    FieldDescriptor::new("user", "Owner", FieldKind::Relation).related_to("profile", "full_name"),
    FieldDescriptor::new("job_title", "Job title", FieldKind::Text),
    FieldDescriptor::new("company_name", "Company", FieldKind::Text),
    FieldDescriptor::new("start_date", "Start date", FieldKind::Text).with_placeholder("YYYY-MM-DD"),
    FieldDescriptor::new("end_date", "End date", FieldKind::Text).with_placeholder("YYYY-MM-DD"),
    FieldDescriptor::new("responsibilities", "Responsibilities", FieldKind::Textarea),
    FieldDescriptor::new("is_current", "Current role", FieldKind::Checkbox),
];

const MESSAGE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
    FieldDescriptor::new("sender_name", "From", FieldKind::Text),
    FieldDescriptor::new("sender_email", "Email", FieldKind::Text),
    FieldDescriptor::new("subject", "Subject", FieldKind::Text),
    FieldDescriptor::new("message_content", "Message", FieldKind::Textarea),
    FieldDescriptor::new("received_date", "Received", FieldKind::Text).read_only(),
    FieldDescriptor::new("is_read", "Read", FieldKind::Checkbox),
    FieldDescriptor::new("response_status", "Status", FieldKind::Select)
        .with_options(RESPONSE_STATUSES),
    FieldDescriptor::new("response_text", "Response", FieldKind::Textarea),
    FieldDescriptor::new("ip_address", "Sender IP", FieldKind::Text).read_only(),
];

const TECHNOLOGY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "ID", FieldKind::Number).read_only(),
    FieldDescriptor::new("name", "Name", FieldKind::Text),
];

const RESOURCES: &[ResourceConfig] = &[
    ResourceConfig {
        key: "profile",
        title: "Profile",
        endpoint: "profile",
        capabilities: Capabilities::FULL,
        fields: PROFILE_FIELDS,
    },
    ResourceConfig {
        key: "projects",
        title: "Projects",
        endpoint: "projects",
        capabilities: Capabilities::FULL,
        fields: PROJECT_FIELDS,
    },
    ResourceConfig {
        key: "skills",
        title: "Skills",
        endpoint: "skills",
        capabilities: Capabilities::FULL,
        fields: SKILL_FIELDS,
    },
    ResourceConfig {
        key: "experience",
        title: "Experience",
        endpoint: "experience",
        capabilities: Capabilities::FULL,
        fields: EXPERIENCE_FIELDS,
    },
    ResourceConfig {
        key: "messages",
        title: "Messages",
        endpoint: "messages",
        capabilities: Capabilities::RESPOND_ONLY,
        fields: MESSAGE_FIELDS,
    },
    ResourceConfig {
        key: "technologies",
        title: "Technologies",
        endpoint: "technologies",
        capabilities: Capabilities::FULL,
        fields: TECHNOLOGY_FIELDS,
    },
];

/// All manageable resources, in navigation order.
pub fn resource_configs() -> &'static [ResourceConfig] {
    RESOURCES
}

pub fn resource_by_key(key: &str) -> Option<&'static ResourceConfig> {
    RESOURCES.iter().find(|r| r.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resource_keys_unique() {
        let keys: HashSet<_> = resource_configs().iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), resource_configs().len());
    }

    #[test]
    fn test_field_names_unique_within_resource() {
        for resource in resource_configs() {
            let names: HashSet<_> = resource.fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), resource.fields.len(), "{}", resource.key);
        }
    }

    #[test]
    fn test_messages_is_respond_only() {
        let messages = resource_by_key("messages").unwrap();
        assert!(!messages.capabilities.create);
        assert!(messages.capabilities.update);
        assert!(!messages.capabilities.delete);
    }

    #[test]
    fn test_server_assigned_fields_are_read_only() {
        for resource in resource_configs() {
            for field in resource.fields {
                if matches!(field.name, "id" | "created_at" | "received_date" | "ip_address") {
                    assert!(field.read_only, "{}.{}", resource.key, field.name);
                }
            }
        }
    }

    #[test]
    fn test_relation_fields_name_an_endpoint() {
        for resource in resource_configs() {
            for field in resource.fields {
                if matches!(field.kind, FieldKind::Relation | FieldKind::MultiSelect) {
                    assert!(field.options_endpoint.is_some(), "{}.{}", resource.key, field.name);
                }
            }
        }
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FieldKind::MultiSelect.as_str(), "multi-select");
        assert_eq!(FieldKind::Textarea.as_str(), "textarea");
    }
}
