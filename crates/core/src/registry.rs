//! Code-to-label registry.
//!
//! A [`CodeLabelRegistry`] holds two immutable code tables (disease and anatomical location)
//! and, for each, the curated [`OptionList`] shown in selection widgets. It is constructed once
//! at startup, validated during construction, and then shared read-only by reference.
//!
//! Legacy codes are modelled as aliases of their successor rather than as duplicate rows: an
//! alias has no label of its own and always resolves to its successor's label.
//!
//! Unknown codes are an expected outcome, not an error. Lookups return `None`, and the
//! `display_*` helpers fall back to the raw code as a neutral placeholder.

use std::collections::{HashMap, HashSet};
use std::fmt;

use derm_types::{Code, Label};
use serde::Serialize;

use crate::dictionary;
use crate::{RegistryError, RegistryResult};

/// Which vocabulary a code belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Disease classes emitted by the classification model.
    Disease,
    /// Anatomical locations of an examined lesion.
    Location,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Disease => "disease",
            Domain::Location => "location",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disease" => Ok(Domain::Disease),
            "location" => Ok(Domain::Location),
            other => Err(RegistryError::InvalidInput(format!(
                "unknown domain '{other}' (expected 'disease' or 'location')"
            ))),
        }
    }
}

/// One recognised code and its display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub code: Code,
    pub label: Label,
}

#[derive(Clone, Debug)]
enum Slot {
    Canonical(Label),
    Alias(Code),
}

/// Immutable mapping from code to label for one [`Domain`].
#[derive(Clone, Debug)]
pub struct CodeTable {
    domain: Domain,
    order: Vec<Code>,
    slots: HashMap<Code, Slot>,
}

impl CodeTable {
    /// Starts building a table for `domain`.
    pub fn builder(domain: Domain) -> CodeTableBuilder {
        CodeTableBuilder {
            domain,
            rows: Vec::new(),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Label for `code`, following an alias to its successor.
    pub fn label(&self, code: &str) -> Option<&Label> {
        match self.slots.get(code)? {
            Slot::Canonical(label) => Some(label),
            Slot::Alias(target) => match self.slots.get(target.as_str())? {
                Slot::Canonical(label) => Some(label),
                Slot::Alias(_) => None,
            },
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.slots.contains_key(code)
    }

    /// Successor of an alias code, or `None` when `code` is canonical or unknown.
    pub fn alias_target(&self, code: &str) -> Option<&Code> {
        match self.slots.get(code)? {
            Slot::Alias(target) => Some(target),
            Slot::Canonical(_) => None,
        }
    }

    pub fn is_alias(&self, code: &str) -> bool {
        self.alias_target(code).is_some()
    }

    /// The canonical code for `code`: itself when canonical, its successor when an alias.
    pub fn canonical(&self, code: &str) -> Option<&Code> {
        let (stored, slot) = self.slots.get_key_value(code)?;
        match slot {
            Slot::Canonical(_) => Some(stored),
            Slot::Alias(target) => Some(target),
        }
    }

    /// Alias/successor pairs in table order.
    pub fn aliases(&self) -> impl Iterator<Item = (&Code, &Code)> + '_ {
        self.order
            .iter()
            .filter_map(|code| self.alias_target(code.as_str()).map(|target| (code, target)))
    }

    /// Every code with its resolved label, in table order. Aliases are included.
    pub fn entries(&self) -> impl Iterator<Item = (&Code, &Label)> + '_ {
        self.order
            .iter()
            .filter_map(|code| self.label(code.as_str()).map(|label| (code, label)))
    }

    /// Number of codes, aliases included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Clone, Debug)]
enum PendingRow {
    Label(String, String),
    Alias(String, String),
}

/// Collects rows for a [`CodeTable`]; all validation happens in [`CodeTableBuilder::build`].
#[derive(Clone, Debug)]
pub struct CodeTableBuilder {
    domain: Domain,
    rows: Vec<PendingRow>,
}

impl CodeTableBuilder {
    pub fn label(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.rows.push(PendingRow::Label(code.into(), label.into()));
        self
    }

    /// Registers `code` as a legacy alias of `successor`.
    pub fn alias(mut self, code: impl Into<String>, successor: impl Into<String>) -> Self {
        self.rows.push(PendingRow::Alias(code.into(), successor.into()));
        self
    }

    /// Validates the collected rows and builds the table.
    ///
    /// # Errors
    ///
    /// - `InvalidCode` / `InvalidLabel` when a code or label is malformed
    /// - `DuplicateCode` when a code is registered twice (as label or alias)
    /// - `DanglingAlias` when an alias points at an unregistered code
    /// - `AliasChain` when an alias points at another alias
    pub fn build(self) -> RegistryResult<CodeTable> {
        let domain = self.domain;
        let parse_code = |raw: &str| {
            Code::parse(raw).map_err(|source| RegistryError::InvalidCode {
                domain,
                code: raw.to_owned(),
                source,
            })
        };

        let mut order = Vec::with_capacity(self.rows.len());
        let mut slots = HashMap::with_capacity(self.rows.len());

        for row in &self.rows {
            let (code, slot) = match row {
                PendingRow::Label(code, label) => {
                    let parsed = parse_code(code)?;
                    let label = Label::new(label).map_err(|source| RegistryError::InvalidLabel {
                        domain,
                        code: code.clone(),
                        source,
                    })?;
                    (parsed, Slot::Canonical(label))
                }
                PendingRow::Alias(code, target) => {
                    (parse_code(code)?, Slot::Alias(parse_code(target)?))
                }
            };

            if slots.contains_key(&code) {
                return Err(RegistryError::DuplicateCode {
                    domain,
                    code: code.to_string(),
                });
            }
            order.push(code.clone());
            slots.insert(code, slot);
        }

        // Aliases may be declared before their successor, so check them once every row is in.
        for code in &order {
            let Some(Slot::Alias(target)) = slots.get(code) else {
                continue;
            };
            match slots.get(target) {
                None => {
                    return Err(RegistryError::DanglingAlias {
                        domain,
                        alias: code.to_string(),
                        target: target.to_string(),
                    })
                }
                Some(Slot::Alias(_)) => {
                    return Err(RegistryError::AliasChain {
                        domain,
                        alias: code.to_string(),
                        target: target.to_string(),
                    })
                }
                Some(Slot::Canonical(_)) => {}
            }
        }

        Ok(CodeTable {
            domain,
            order,
            slots,
        })
    }
}

/// Curated, ordered subset of a table's codes for selection widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionList {
    domain: Domain,
    entries: Vec<CodeEntry>,
}

impl OptionList {
    /// Resolves `order` against `table`, keeping the given order exactly.
    ///
    /// # Errors
    ///
    /// - `ReferentialMismatch` when a code is not in `table`
    /// - `AliasInOptions` when a code is an alias
    /// - `DuplicateOption` when a code appears more than once
    pub fn resolve<I, S>(table: &CodeTable, order: I) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domain = table.domain();
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for code in order {
            let code = code.as_ref();
            if table.is_alias(code) {
                return Err(RegistryError::AliasInOptions {
                    domain,
                    code: code.to_owned(),
                });
            }
            let (Some(canonical), Some(label)) = (table.canonical(code), table.label(code)) else {
                return Err(RegistryError::ReferentialMismatch {
                    domain,
                    code: code.to_owned(),
                });
            };
            if !seen.insert(canonical.clone()) {
                return Err(RegistryError::DuplicateOption {
                    domain,
                    code: code.to_owned(),
                });
            }
            entries.push(CodeEntry {
                code: canonical.clone(),
                label: label.clone(),
            });
        }

        Ok(Self { domain, entries })
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn as_slice(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodeEntry> {
        self.entries.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &Code> + '_ {
        self.entries.iter().map(|entry| &entry.code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a CodeEntry;
    type IntoIter = std::slice::Iter<'a, CodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Process-wide, read-only vocabulary for disease and location codes.
///
/// Build it once (usually with [`CodeLabelRegistry::standard`]) and pass it by reference, or
/// wrap it in an `Arc` when several owners need it. There is no interior mutability.
#[derive(Clone, Debug)]
pub struct CodeLabelRegistry {
    diseases: CodeTable,
    locations: CodeTable,
    disease_options: OptionList,
    location_options: OptionList,
}

impl CodeLabelRegistry {
    /// Builds the registry from the curated vocabulary.
    pub fn standard() -> RegistryResult<Self> {
        let mut builder = Self::builder();
        for (code, label) in dictionary::DISEASE_LABELS {
            builder = builder.disease(*code, *label);
        }
        for (code, successor) in dictionary::DISEASE_ALIASES {
            builder = builder.disease_alias(*code, *successor);
        }
        for (code, label) in dictionary::LOCATION_LABELS {
            builder = builder.location(*code, *label);
        }
        for (code, successor) in dictionary::LOCATION_ALIASES {
            builder = builder.location_alias(*code, *successor);
        }
        builder
            .disease_options(dictionary::DISEASE_OPTION_ORDER.iter().copied())
            .location_options(dictionary::LOCATION_OPTION_ORDER.iter().copied())
            .build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            diseases: CodeTable::builder(Domain::Disease),
            locations: CodeTable::builder(Domain::Location),
            disease_order: Vec::new(),
            location_order: Vec::new(),
        }
    }

    pub fn label_for_disease(&self, code: &str) -> Option<&str> {
        self.diseases.label(code).map(Label::as_str)
    }

    pub fn label_for_location(&self, code: &str) -> Option<&str> {
        self.locations.label(code).map(Label::as_str)
    }

    pub fn label_for(&self, domain: Domain, code: &str) -> Option<&str> {
        self.table(domain).label(code).map(Label::as_str)
    }

    pub fn disease_options(&self) -> &[CodeEntry] {
        self.disease_options.as_slice()
    }

    pub fn location_options(&self) -> &[CodeEntry] {
        self.location_options.as_slice()
    }

    pub fn options(&self, domain: Domain) -> &OptionList {
        match domain {
            Domain::Disease => &self.disease_options,
            Domain::Location => &self.location_options,
        }
    }

    pub fn table(&self, domain: Domain) -> &CodeTable {
        match domain {
            Domain::Disease => &self.diseases,
            Domain::Location => &self.locations,
        }
    }

    pub fn diseases(&self) -> &CodeTable {
        &self.diseases
    }

    pub fn locations(&self) -> &CodeTable {
        &self.locations
    }

    /// Label for a disease code, or the code itself when it is not curated.
    pub fn display_disease<'a>(&'a self, code: &'a str) -> &'a str {
        self.display(Domain::Disease, code)
    }

    /// Label for a location code, or the code itself when it is not curated.
    pub fn display_location<'a>(&'a self, code: &'a str) -> &'a str {
        self.display(Domain::Location, code)
    }

    pub fn display<'a>(&'a self, domain: Domain, code: &'a str) -> &'a str {
        self.label_for(domain, code).unwrap_or(code)
    }

    /// `"<label> (<CODE>)"` for a disease code; unknown codes render as `"<CODE> (<CODE>)"`.
    pub fn disease_display_with_code(&self, code: &str) -> String {
        crate::display::format_with_code(self.display_disease(code), code)
    }
}

/// Collects tables and option orders for a [`CodeLabelRegistry`].
#[derive(Clone, Debug)]
pub struct RegistryBuilder {
    diseases: CodeTableBuilder,
    locations: CodeTableBuilder,
    disease_order: Vec<String>,
    location_order: Vec<String>,
}

impl RegistryBuilder {
    pub fn disease(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.diseases = self.diseases.label(code, label);
        self
    }

    pub fn disease_alias(mut self, code: impl Into<String>, successor: impl Into<String>) -> Self {
        self.diseases = self.diseases.alias(code, successor);
        self
    }

    pub fn location(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.locations = self.locations.label(code, label);
        self
    }

    pub fn location_alias(mut self, code: impl Into<String>, successor: impl Into<String>) -> Self {
        self.locations = self.locations.alias(code, successor);
        self
    }

    /// Sets the disease selection order, replacing any previous order.
    pub fn disease_options<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disease_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the location selection order, replacing any previous order.
    pub fn location_options<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Validates everything collected so far and builds the registry.
    pub fn build(self) -> RegistryResult<CodeLabelRegistry> {
        let diseases = self.diseases.build()?;
        let locations = self.locations.build()?;
        let disease_options = OptionList::resolve(&diseases, &self.disease_order)?;
        let location_options = OptionList::resolve(&locations, &self.location_order)?;

        tracing::debug!(
            diseases = diseases.len(),
            disease_aliases = diseases.aliases().count(),
            disease_options = disease_options.len(),
            locations = locations.len(),
            location_options = location_options.len(),
            "built code label registry"
        );

        Ok(CodeLabelRegistry {
            diseases,
            locations,
            disease_options,
            location_options,
        })
    }
}
