//! Drug-drug interaction graph.
//!
//! Hand-curated adjacency over a handful of drug families:
//! anticoagulants, MAO inhibitors, macrolides, statins, cardiac
//! glycosides, benzodiazepines. Entries are not guaranteed bidirectional;
//! the lookup checks both directions so a one-sided entry still fires.

use std::collections::{HashMap, HashSet};

use tracing::debug;

/// Symmetric-by-lookup map of interacting drugs.
pub struct DrugInteractionGraph {
    /// normalized drug name → set of interacting drug names
    adjacency: HashMap<String, HashSet<String>>,
    /// "a-b" → free-text interaction description
    descriptions: HashMap<String, String>,
}

impl Default for DrugInteractionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DrugInteractionGraph {
    /// Create a graph with the default curated tables.
    pub fn new() -> Self {
        Self {
            adjacency: Self::default_adjacency(),
            descriptions: Self::default_descriptions(),
        }
    }

    /// Normalize a drug name for lookup: lowercase, trim, strip a
    /// parenthetical brand/dosage suffix and trailing dose tokens
    /// ("Warfarina 5 mg" → "warfarina").
    pub fn normalize(name: &str) -> String {
        let lower = name.to_lowercase();
        let without_parens = match lower.find('(') {
            Some(idx) => &lower[..idx],
            None => &lower[..],
        };
        let mut words: Vec<&str> = Vec::new();
        for word in without_parens.split_whitespace() {
            // A token starting with a digit begins the dose portion
            if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                break;
            }
            words.push(word);
        }
        words.join(" ")
    }

    /// Whether two drugs interact, checked in both directions.
    pub fn has_interaction(&self, a: &str, b: &str) -> bool {
        let a = Self::normalize(a);
        let b = Self::normalize(b);
        if a.is_empty() || b.is_empty() {
            return false;
        }
        self.adjacency.get(&a).is_some_and(|s| s.contains(&b))
            || self.adjacency.get(&b).is_some_and(|s| s.contains(&a))
    }

    /// Descriptions of every interaction between `new_drug` and the drugs
    /// already prescribed. Never errors; an unknown pair that is adjacent
    /// in the graph falls back to a generic templated description.
    pub fn interactions_for(&self, new_drug: &str, existing: &[String]) -> Vec<String> {
        let new_norm = Self::normalize(new_drug);
        let mut found = Vec::new();
        for other in existing {
            let other_norm = Self::normalize(other);
            if self.has_interaction(&new_norm, &other_norm) {
                debug!(drug = %new_norm, existing = %other_norm, "interacción detectada");
                found.push(self.describe(&new_norm, &other_norm));
            }
        }
        found
    }

    /// Description lookup: "a-b", then "b-a", then a generic template.
    fn describe(&self, a: &str, b: &str) -> String {
        self.descriptions
            .get(&format!("{}-{}", a, b))
            .or_else(|| self.descriptions.get(&format!("{}-{}", b, a)))
            .cloned()
            .unwrap_or_else(|| format!("Interacción potencial entre {} y {}", a, b))
    }

    /// Default adjacency. Some directions are intentionally one-sided;
    /// the symmetric lookup covers them.
    fn default_adjacency() -> HashMap<String, HashSet<String>> {
        let mut map: HashMap<String, HashSet<String>> = HashMap::new();

        let mut add = |drug: &str, others: &[&str]| {
            map.entry(drug.into())
                .or_default()
                .extend(others.iter().map(|s| s.to_string()));
        };

        // Anticoagulants × NSAIDs / antibiotics
        add(
            "warfarina",
            &[
                "aspirina",
                "ácido acetilsalicílico",
                "ibuprofeno",
                "naproxeno",
                "diclofenaco",
                "ciprofloxacino",
                "metronidazol",
            ],
        );
        add("acenocumarol", &["aspirina", "ibuprofeno", "naproxeno"]);
        add("heparina", &["aspirina", "ketorolaco"]);

        // MAO inhibitors × serotonergics
        add(
            "fenelzina",
            &["fluoxetina", "sertralina", "paroxetina", "tramadol"],
        );
        add(
            "tranilcipromina",
            &["fluoxetina", "sertralina", "tramadol"],
        );

        // Macrolides × statins
        add("eritromicina", &["simvastatina", "atorvastatina", "lovastatina"]);
        add("claritromicina", &["simvastatina", "atorvastatina", "lovastatina"]);

        // Cardiac glycosides (one-sided on purpose)
        add("digoxina", &["amiodarona", "verapamilo", "claritromicina", "espironolactona"]);

        // Benzodiazepines × opioids
        add("diazepam", &["tramadol", "morfina", "codeína"]);
        add("alprazolam", &["tramadol", "morfina"]);
        add("midazolam", &["morfina", "fentanilo"]);

        map
    }

    /// Default interaction descriptions, keyed "a-b".
    fn default_descriptions() -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(
            "warfarina-aspirina".into(),
            "Warfarina + aspirina: riesgo aumentado de sangrado mayor".into(),
        );
        map.insert(
            "warfarina-ibuprofeno".into(),
            "Warfarina + ibuprofeno: potenciación del efecto anticoagulante y riesgo de hemorragia digestiva".into(),
        );
        map.insert(
            "warfarina-ciprofloxacino".into(),
            "Warfarina + ciprofloxacino: el antibiótico eleva el INR".into(),
        );
        map.insert(
            "fenelzina-tramadol".into(),
            "IMAO + tramadol: riesgo de síndrome serotoninérgico".into(),
        );
        map.insert(
            "fenelzina-fluoxetina".into(),
            "IMAO + ISRS: riesgo de síndrome serotoninérgico severo".into(),
        );
        map.insert(
            "eritromicina-simvastatina".into(),
            "Macrólido + estatina: riesgo de miopatía y rabdomiólisis".into(),
        );
        map.insert(
            "claritromicina-simvastatina".into(),
            "Macrólido + estatina: riesgo de miopatía y rabdomiólisis".into(),
        );
        map.insert(
            "digoxina-amiodarona".into(),
            "Digoxina + amiodarona: aumento de niveles de digoxina, riesgo de toxicidad".into(),
        );
        map.insert(
            "diazepam-tramadol".into(),
            "Benzodiacepina + opioide: depresión respiratoria aditiva".into(),
        );
        map.insert(
            "diazepam-morfina".into(),
            "Benzodiacepina + opioide: depresión respiratoria aditiva".into(),
        );

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_dose_and_parens() {
        assert_eq!(DrugInteractionGraph::normalize("Warfarina 5 mg"), "warfarina");
        assert_eq!(DrugInteractionGraph::normalize("  Aspirina 100 mg  "), "aspirina");
        assert_eq!(DrugInteractionGraph::normalize("Simvastatina (Zocor)"), "simvastatina");
        assert_eq!(
            DrugInteractionGraph::normalize("Ácido acetilsalicílico 100mg"),
            "ácido acetilsalicílico"
        );
    }

    #[test]
    fn test_warfarina_aspirina_interaction() {
        let graph = DrugInteractionGraph::new();
        let found = graph.interactions_for("Aspirina 100 mg", &["Warfarina 5 mg".to_string()]);
        assert_eq!(found.len(), 1);
        assert!(found[0].to_lowercase().contains("warfarina"));
        assert!(found[0].to_lowercase().contains("aspirina"));
    }

    #[test]
    fn test_lookup_is_symmetric_despite_one_sided_entries() {
        let graph = DrugInteractionGraph::new();
        // The table only lists digoxina → amiodarona
        assert!(graph.has_interaction("digoxina", "amiodarona"));
        assert!(graph.has_interaction("amiodarona", "digoxina"));

        let forward = graph.interactions_for("amiodarona", &["digoxina".to_string()]);
        let backward = graph.interactions_for("digoxina", &["amiodarona".to_string()]);
        assert!(!forward.is_empty());
        assert!(!backward.is_empty());
    }

    #[test]
    fn test_generic_fallback_description() {
        let graph = DrugInteractionGraph::new();
        // Adjacent pair without a curated description
        let found = graph.interactions_for("espironolactona", &["digoxina".to_string()]);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("Interacción potencial"));
    }

    #[test]
    fn test_no_interaction_for_unrelated_drugs() {
        let graph = DrugInteractionGraph::new();
        assert!(!graph.has_interaction("paracetamol", "amoxicilina"));
        assert!(graph
            .interactions_for("Paracetamol 500mg", &["Amoxicilina 500mg".to_string()])
            .is_empty());
    }

    #[test]
    fn test_blank_names_never_match() {
        let graph = DrugInteractionGraph::new();
        assert!(!graph.has_interaction("", "warfarina"));
        assert!(graph.interactions_for("", &["".to_string()]).is_empty());
    }

    #[test]
    fn test_multiple_existing_drugs() {
        let graph = DrugInteractionGraph::new();
        let existing = vec![
            "Warfarina 5mg".to_string(),
            "Paracetamol 500mg".to_string(),
            "Ciprofloxacino 500mg".to_string(),
        ];
        // warfarina interacts with ciprofloxacino; aspirin interacts with warfarina
        let found = graph.interactions_for("Aspirina", &existing);
        assert_eq!(found.len(), 1);

        let found = graph.interactions_for("Ibuprofeno 400mg", &existing);
        assert_eq!(found.len(), 1);
    }
}
