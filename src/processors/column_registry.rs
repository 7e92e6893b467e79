use std::collections::HashSet;

/// The outcome of claiming a column identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedColumn {
    pub name: String,
    pub renamed_from: Option<String>,
}

/// Column identities already taken during one run.
///
/// Append-only: names are never released. `claims` keeps acceptance order.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    taken: HashSet<String>,
    claims: Vec<String>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `requested`, appending `_1`, `_2`, ... until it is unique
    pub fn claim(&mut self, requested: &str) -> ClaimedColumn {
        let mut name = requested.to_string();
        let mut suffix = 0u32;
        while self.taken.contains(&name) {
            suffix += 1;
            name = format!("{}_{}", requested, suffix);
        }

        self.taken.insert(name.clone());
        self.claims.push(name.clone());

        ClaimedColumn {
            renamed_from: (name != requested).then(|| requested.to_string()),
            name,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let mut registry = ColumnRegistry::new();
        assert_eq!(registry.claim("Temp").renamed_from, None);

        let second = registry.claim("Temp");
        assert_eq!(second.name, "Temp_1");
        assert_eq!(second.renamed_from.as_deref(), Some("Temp"));

        assert_eq!(registry.claim("Temp").name, "Temp_2");
        assert_eq!(registry.names(), ["Temp", "Temp_1", "Temp_2"]);
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let mut registry = ColumnRegistry::new();
        registry.claim("Temp_1");
        registry.claim("Temp");
        assert_eq!(registry.claim("Temp").name, "Temp_2");
        assert_eq!(registry.claim("Temp_1").name, "Temp_1_1");
    }
}
