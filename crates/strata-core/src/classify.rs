//! Declaration classification against architectural conventions.
//!
//! Roles are derived, never stored: classification is a pure function of
//! the semantic index and the configured conventions, recomputed per pass.

use crate::source::{SemanticIndex, TypeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Architectural role of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// A data-access-layer implementation class.
    DataAccessImplementation,
    /// A service contract interface.
    ServiceContract,
    /// A service implementation class bound to a contract.
    ServiceImplementation,
}

/// Naming and marker conventions the classifier and rules key on.
///
/// Defaults match the analyzed codebases; every knob can be overridden
/// from the `[conventions]` table of `strata.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Reserved base class name always classified as DAL.
    pub dal_base_name: String,
    /// Class name prefix marking DAL implementations.
    pub dal_prefix: String,
    /// Marker attribute on implementation classes.
    pub implementation_marker: String,
    /// Marker attribute on service contract interfaces.
    pub contract_marker: String,
    /// Suffix of business implementation project names.
    pub business_suffix: String,
    /// Low-level accessor names forbidden outside generated coverage.
    pub low_level_accessors: Vec<String>,
    /// Suffix pairing an implementation project to its test project.
    pub test_project_suffix: String,
    /// Directory name holding DAL implementation documents.
    pub dal_directory: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            dal_base_name: "AbstractDal".to_string(),
            dal_prefix: "Dal".to_string(),
            implementation_marker: "RegisterImpl".to_string(),
            contract_marker: "RegisterContract".to_string(),
            business_suffix: "Implementation".to_string(),
            low_level_accessors: vec!["GetSqlCommand".to_string(), "GetBroker".to_string()],
            test_project_suffix: ".Test".to_string(),
            dal_directory: "DAL.Implementation".to_string(),
        }
    }
}

impl Conventions {
    /// Whether an invoked member name is a deny-listed low-level accessor.
    #[must_use]
    pub fn is_low_level_accessor(&self, name: &str) -> bool {
        self.low_level_accessors.iter().any(|a| a == name)
    }

    /// Name of the test project paired with an implementation project.
    #[must_use]
    pub fn test_project_name(&self, project: &str) -> String {
        format!("{project}{}", self.test_project_suffix)
    }
}

/// Classifies a type by simple name against the index.
///
/// Absent markers simply yield no role; classification never fails and
/// is idempotent over an immutable index.
#[must_use]
pub fn classify(name: &str, index: &SemanticIndex, conventions: &Conventions) -> BTreeSet<Role> {
    let mut roles = BTreeSet::new();
    let Some(entry) = index.get(name) else {
        return roles;
    };

    match entry.kind {
        TypeKind::Class => {
            let marked_impl = entry.attributes.contains(&conventions.implementation_marker);

            if name == conventions.dal_base_name
                || (name.starts_with(&conventions.dal_prefix) && marked_impl)
            {
                roles.insert(Role::DataAccessImplementation);
            }

            if marked_impl {
                let implements_contract = index.all_interfaces(name).iter().any(|interface| {
                    index.has_attribute(interface, &conventions.contract_marker)
                });
                if implements_contract {
                    roles.insert(Role::ServiceImplementation);
                }
            }
        }
        TypeKind::Interface => {
            if entry.attributes.contains(&conventions.contract_marker) {
                roles.insert(Role::ServiceContract);
            }
        }
    }

    roles
}

/// Whether a project is a business implementation assembly.
///
/// Only the orchestration layer uses this, to scope which documents are
/// analyzed at all.
#[must_use]
pub fn is_business_assembly(project_name: &str, conventions: &Conventions) -> bool {
    !project_name.is_empty() && project_name.ends_with(&conventions.business_suffix)
}

/// Application name of a project: its first dot-segment.
/// `Chaine.ReferentielImplementation` -> `Chaine`.
#[must_use]
pub fn application_name(project_name: &str) -> &str {
    project_name.split('.').next().unwrap_or(project_name)
}

/// Whether a document path is a DAL implementation file: a `.cs` file
/// named with the DAL prefix directly under the DAL directory.
#[must_use]
pub fn is_dal_document(path: &Path, conventions: &Conventions) -> bool {
    let in_dal_dir = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|s| s.to_str())
        .is_some_and(|dir| dir == conventions.dal_directory);
    if !in_dal_dir {
        return false;
    }

    let is_cs = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cs"));

    let named_dal = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.starts_with(&conventions.dal_prefix));

    is_cs && named_dal
}
