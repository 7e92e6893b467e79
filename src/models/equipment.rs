use serde::{Deserialize, Serialize};

/// One row of the techant master list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TechantRecord {
    pub ref_techant: String,
    pub ouvrage: String,
    pub champ: String,
    pub libelle_2: String,
    pub frequence: String,
    #[serde(rename = "type")]
    pub type_val: String,
}

impl TechantRecord {
    /// Trim every field, the master list is padded inconsistently
    pub fn trimmed(self) -> Self {
        Self {
            ref_techant: self.ref_techant.trim().to_string(),
            ouvrage: self.ouvrage.trim().to_string(),
            champ: self.champ.trim().to_string(),
            libelle_2: self.libelle_2.trim().to_string(),
            frequence: self.frequence.trim().to_string(),
            type_val: self.type_val.trim().to_string(),
        }
    }
}

/// Selects techant points of one kind of equipment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub champ: String,
    pub libelle_2: Option<String>,
    pub frequence: String,
    pub type_val: String,
    pub suffix: String,
    pub category: String,
}

impl FilterRule {
    pub fn new(
        champ: &str,
        libelle_2: Option<&str>,
        frequence: &str,
        type_val: &str,
        suffix: &str,
        category: &str,
    ) -> Self {
        Self {
            champ: champ.to_string(),
            libelle_2: libelle_2.map(str::to_string),
            frequence: frequence.to_string(),
            type_val: type_val.to_string(),
            suffix: suffix.to_string(),
            category: category.to_string(),
        }
    }

    /// Exact match, or a longer name such as "CH1_2Y7 VANNE 2 VOIES"
    pub fn champ_matches(&self, champ: &str) -> bool {
        champ == self.champ
            || champ
                .strip_prefix(self.champ.as_str())
                .is_some_and(|rest| rest.starts_with(' '))
    }

    pub fn matches(&self, record: &TechantRecord) -> bool {
        self.champ_matches(&record.champ)
            && self
                .libelle_2
                .as_deref()
                .map_or(true, |lib| lib == record.libelle_2)
            && record.frequence == self.frequence
            && record.type_val == self.type_val
    }
}

/// One line of a collector configuration export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigExportRow {
    #[serde(rename = "Nom")]
    pub nom: String,
    #[serde(rename = "Table")]
    pub table: String,
    pub nbr: u32,
}
