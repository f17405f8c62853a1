//! # Credential Record Builder
//!
//! Pure mapping from a [`Server`] onto the field set the vault's
//! item-creation call consumes. Field ordering is stable so dry-run
//! output and tests stay reproducible.

use aeza1password_common::model::Server;

/// Tag applied to every item this tool creates.
pub const AEZA_TAG: &str = "aeza";

/// Management page for one service in the provider's customer panel.
const SERVICE_PAGE: &str = "https://my.aeza.net/services";

/// How a field is stored in the vault item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Concealed,
    Email,
}

/// One labelled field, optionally grouped under a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub section: Option<String>,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    fn scalar(label: &str, kind: FieldKind, value: &str) -> Self {
        Self {
            section: None,
            label: label.to_string(),
            kind,
            value: value.to_string(),
        }
    }
}

/// The field set submitted to the vault for one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
    pub fields: Vec<Field>,
}

/// Builds the credential record for one server.
///
/// Field order: username, password, email (when present), notes, then one
/// section per IP address in server order with its address and, when
/// present, its domain.
pub fn build_record(server: &Server) -> CredentialRecord {
    let mut fields = vec![
        Field::scalar("username", FieldKind::Text, &server.admin_username),
        Field::scalar("password", FieldKind::Concealed, &server.admin_password),
    ];

    if let Some(email) = &server.email {
        fields.push(Field::scalar("email", FieldKind::Email, email));
    }

    let notes = format!(
        "OS: {}\nCPU: {} cores\nRAM: {} GB\nStorage: {} GB",
        server.os, server.cpu_count, server.ram_gb, server.storage_gb
    );
    fields.push(Field::scalar("notesPlain", FieldKind::Text, &notes));

    for (idx, ip) in server.ip_addresses.iter().enumerate() {
        let section = format!("IP Address {}", idx + 1);
        fields.push(Field {
            section: Some(section.clone()),
            label: "address".to_string(),
            kind: FieldKind::Text,
            value: ip.address.clone(),
        });
        if let Some(domain) = &ip.domain {
            fields.push(Field {
                section: Some(section),
                label: "domain".to_string(),
                kind: FieldKind::Text,
                value: domain.clone(),
            });
        }
    }

    CredentialRecord {
        title: format!("{} {}", server.name, server.location.flag),
        url: format!("{SERVICE_PAGE}/{}", server.service_id),
        tags: vec![AEZA_TAG.to_string()],
        fields,
    }
}
