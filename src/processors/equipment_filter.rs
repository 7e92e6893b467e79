use crate::models::{ConfigExportRow, FilterRule, TechantRecord};
use crate::utils::constants::CONFIG_EXPORT_SAMPLE_COUNT;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const DEFAULT_CATEGORY: &str = "controlCAD";
const FREQ_15MIN: &str = "15 MINUTES";
const TYPE_MEAN: &str = "Valeur moyenne";
const TYPE_MAX: &str = "Valeur maximum";

/// Return temperature meter plus the four circuit valves
pub fn default_rules() -> Vec<FilterRule> {
    let valve = |champ: &str| {
        FilterRule::new(champ, None, FREQ_15MIN, TYPE_MAX, "PosVan", DEFAULT_CATEGORY)
    };
    vec![
        FilterRule::new(
            "CH1_1C2 COMPTEUR",
            Some("TEMPERATURE RETOUR"),
            FREQ_15MIN,
            TYPE_MEAN,
            "TempRet",
            DEFAULT_CATEGORY,
        ),
        valve("CH1_2Y7 VANNE"),
        valve("CH2_4Y4 VANNE"),
        valve("CH3_5Y4 VANNE"),
        valve("CH4_6Y4 VANNE"),
    ]
}

/// (ouvrage, rule champ, rule libelle_2)
type TechantKey = (String, String, Option<String>);

/// Matches CAD points against the techant master list.
pub struct EquipmentFilter {
    rules: Vec<FilterRule>,
}

impl EquipmentFilter {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    /// First ref_techant per key; each techant row is claimed by its first matching rule
    fn index_techant(&self, techant: &[TechantRecord]) -> HashMap<TechantKey, String> {
        let mut index = HashMap::new();
        for record in techant {
            if let Some(rule) = self.rules.iter().find(|rule| rule.matches(record)) {
                index
                    .entry((
                        record.ouvrage.clone(),
                        rule.champ.clone(),
                        rule.libelle_2.clone(),
                    ))
                    .or_insert_with(|| record.ref_techant.clone());
            }
        }
        index
    }

    /// Export rows grouped by output category, in CAD point then rule order
    pub fn build_exports(
        &self,
        egids: &[String],
        techant: &[TechantRecord],
    ) -> BTreeMap<String, Vec<ConfigExportRow>> {
        let index = self.index_techant(techant);
        let mut seen: HashSet<(&str, usize)> = HashSet::new();
        let mut exports: BTreeMap<String, Vec<ConfigExportRow>> = BTreeMap::new();

        for egid in egids {
            let ouvrage = format!("{} SST", egid);
            for (i, rule) in self.rules.iter().enumerate() {
                let key = (ouvrage.clone(), rule.champ.clone(), rule.libelle_2.clone());
                let Some(ref_techant) = index.get(&key) else {
                    continue;
                };
                if !seen.insert((egid.as_str(), i)) {
                    continue;
                }
                exports
                    .entry(rule.category.clone())
                    .or_default()
                    .push(ConfigExportRow {
                        nom: format!("{}_{}", egid, rule.suffix),
                        table: format!("techant{}", ref_techant),
                        nbr: CONFIG_EXPORT_SAMPLE_COUNT,
                    });
            }
        }
        exports
    }
}

impl Default for EquipmentFilter {
    fn default() -> Self {
        Self::new(default_rules())
    }
}
