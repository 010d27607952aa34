//! Query router: free text in, formatted document out
//!
//! Dispatch is deliberately a flat substring scan, not NLP. Priority is
//! fixed: failure-mode name match, then category match, then the global
//! listing commands, then help. Within a tier the first match in store
//! order wins, which keeps routing deterministic for a given store.
//!
//! The only nondeterminism is the demonstration scenario, drawn uniformly
//! at random per call; the random source is injectable so tests can seed
//! it.

use crate::taxonomy::TaxonomyStore;
use crate::types::FailureMode;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

/// Fixed explanatory text for the three taxonomy categories
///
/// Static configuration, not derived data: a category outside this table
/// gets a placeholder.
fn category_description(category: &str) -> Option<&'static str> {
    match category {
        "Communication Failures" => Some(
            "Communication failures occur when information exchange between \
             multiple LLM agents is impaired. These failures can result from \
             information withholding, miscommunication, verbosity issues, \
             incomplete exchanges, or signal distortion. They represent \
             fundamental challenges in the transmission and reception of \
             information between autonomous agents.",
        ),
        "Alignment Failures" => Some(
            "Alignment failures emerge when the goals, values, or world models \
             of multiple agents are not properly synchronized. These include \
             inter-agent misalignment, divergent objectives, conflicting \
             prioritization, inconsistent world models, and value misalignment. \
             Such failures represent deeper architectural and design challenges \
             in multi-agent systems.",
        ),
        "Decision/Coordination Failures" => Some(
            "Decision and coordination failures manifest when multiple agents \
             cannot effectively reach consensus or coordinate their actions. \
             These include decision paralysis, fragmented consensus, resource \
             misallocation, and coordination overhead. These failures reveal \
             limitations in the collective decision-making capabilities of \
             multi-agent systems.",
        ),
        _ => None,
    }
}

/// Routes free-text requests against a borrowed taxonomy store
pub struct QueryRouter<'a> {
    store: &'a TaxonomyStore,
    rng: Box<dyn RngCore>,
}

impl<'a> QueryRouter<'a> {
    /// Router with an OS-entropy random source (production default)
    pub fn new(store: &'a TaxonomyStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Router with a caller-supplied random source (deterministic tests)
    pub fn with_rng(store: &'a TaxonomyStore, rng: impl RngCore + 'static) -> Self {
        Self {
            store,
            rng: Box::new(rng),
        }
    }

    /// Map a request to a document. Total: any input gets some response.
    pub fn route(&mut self, request: &str) -> String {
        let request_lower = request.to_lowercase();

        // 1. Specific failure mode, first match in store order wins
        let matched = self
            .store
            .modes()
            .find(|mode| request_lower.contains(&mode.name.to_lowercase()));
        if let Some(mode) = matched {
            return self.failure_mode_document(mode);
        }

        // 2. Category, matched as "explain <category>" / "about <category>"
        let matched = self.store.categories().iter().find(|category| {
            let lower = category.to_lowercase();
            request_lower.contains(&format!("explain {}", lower))
                || request_lower.contains(&format!("about {}", lower))
        });
        if let Some(category) = matched {
            return self.category_document(category);
        }

        // 3. Global listings
        if request_lower.contains("list all failure modes")
            || request_lower.contains("show all failures")
        {
            return self.all_modes_document();
        }

        if request_lower.contains("list all categories")
            || request_lower.contains("show all categories")
        {
            return self.all_categories_document();
        }

        // 4. Fall through to help
        help_document()
    }

    /// Full document for one failure mode
    pub fn failure_mode_document(&mut self, mode: &FailureMode) -> String {
        let mut doc = format!("# {} (Category: {})", mode.name, mode.category);

        doc.push_str("\n\n## Definition\n");
        if mode.description.is_empty() {
            doc.push_str("No description available.");
        } else {
            doc.push_str(&mode.description);
        }

        doc.push_str("\n\n## Demonstration\n");
        doc.push_str(&self.demonstrate(mode));

        doc.push_str("\n\n## PhD-Level Analysis\n");
        if mode.phd_level_analysis.is_empty() {
            doc.push_str(&format!("No analysis available for {}.", mode.name));
        } else {
            doc.push_str(&mode.phd_level_analysis);
        }

        doc.push_str("\n\n## Solutions\n");
        doc.push_str("\n### Tactical Solutions\n");
        for solution in &mode.tactical_solutions {
            doc.push_str(&format!("- {}\n", solution));
        }
        doc.push_str("\n### Structural Solutions\n");
        for solution in &mode.structural_solutions {
            doc.push_str(&format!("- {}\n", solution));
        }

        doc
    }

    /// One scenario drawn uniformly at random, independently per call
    fn demonstrate(&mut self, mode: &FailureMode) -> String {
        mode.example_scenarios
            .choose(&mut *self.rng)
            .cloned()
            .unwrap_or_else(|| {
                format!("No demonstration scenarios available for {}.", mode.name)
            })
    }

    /// Document for one category: fixed text plus member list
    pub fn category_document(&self, category: &str) -> String {
        let mut doc = format!(
            "# {}\n\n{}\n\n## Failure Modes in this Category:\n",
            category,
            self.explain_category(category)
        );
        self.push_member_bullets(&mut doc, category);
        doc
    }

    /// Every mode, grouped by category in store order
    pub fn all_modes_document(&self) -> String {
        let mut doc = String::from("# All Failure Modes\n\n");
        for category in self.store.categories() {
            doc.push_str(&format!("## {}\n", category));
            self.push_member_bullets(&mut doc, category);
            doc.push('\n');
        }
        doc
    }

    /// Every category with its explanatory text
    pub fn all_categories_document(&self) -> String {
        let mut doc = String::from("# All Failure Mode Categories\n\n");
        for category in self.store.categories() {
            doc.push_str(&format!(
                "## {}\n{}\n\n",
                category,
                self.explain_category(category)
            ));
        }
        doc
    }

    fn explain_category(&self, category: &str) -> String {
        category_description(category)
            .map(String::from)
            .unwrap_or_else(|| format!("No description available for {}.", category))
    }

    fn push_member_bullets(&self, doc: &mut String, category: &str) {
        for name in self.store.modes_in(category) {
            let short = self
                .store
                .get(name)
                .map(|m| m.short_description.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("No description available.");
            doc.push_str(&format!("- **{}**: {}\n", name, short));
        }
    }
}

/// Static help text enumerating the supported request shapes
pub fn help_document() -> String {
    let mut doc = String::from("# Multi-Agent Failure Educator Help\n\n");
    doc.push_str(
        "I can help you learn about why multi-agent LLM systems fail. \
         Here are some things you can ask me:\n\n",
    );
    doc.push_str(
        "- Ask about a specific failure mode (e.g., 'Show me an example of information withholding')\n",
    );
    doc.push_str(
        "- Request explanation of a failure category (e.g., 'Explain communication failures')\n",
    );
    doc.push_str("- Ask for solutions to a particular failure mode\n");
    doc.push_str("- Request a list of all failure modes or categories\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureMode;

    fn mode(name: &str, category: &str) -> FailureMode {
        FailureMode {
            name: name.to_string(),
            category: category.to_string(),
            short_description: format!("{} in short", name),
            description: format!("{} at length", name),
            example_scenarios: vec![
                format!("{} scenario one", name),
                format!("{} scenario two", name),
            ],
            phd_level_analysis: format!("{} analysis", name),
            tactical_solutions: vec!["Add a checklist".to_string()],
            structural_solutions: vec!["Redesign the protocol".to_string()],
        }
    }

    fn test_store() -> TaxonomyStore {
        TaxonomyStore::from_modes(vec![
            mode("Information Withholding", "Communication Failures"),
            mode("Vague Handoff", "Communication Failures"),
            mode("Divergent Objectives", "Alignment Failures"),
        ])
    }

    fn seeded_router(store: &TaxonomyStore) -> QueryRouter<'_> {
        QueryRouter::with_rng(store, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_route_mode_name_case_insensitive() {
        let store = test_store();
        let mut router = seeded_router(&store);

        let doc = router.route("show me an example of INFORMATION WITHHOLDING please");
        assert!(doc.starts_with("# Information Withholding (Category: Communication Failures)"));
        assert!(doc.contains("## Definition\nInformation Withholding at length"));
        assert!(doc.contains("## PhD-Level Analysis\nInformation Withholding analysis"));
    }

    #[test]
    fn test_route_first_mode_in_store_order_wins() {
        let store = test_store();
        let mut router = seeded_router(&store);

        // Both names are substrings; the earlier store entry wins
        let doc = router.route("compare vague handoff with information withholding");
        assert!(doc.starts_with("# Information Withholding"));
    }

    #[test]
    fn test_route_category_explain_and_about() {
        let store = test_store();
        let mut router = seeded_router(&store);

        let doc = router.route("Explain communication failures");
        assert!(doc.starts_with("# Communication Failures"));
        assert!(doc.contains("## Failure Modes in this Category:"));
        assert!(doc.contains("- **Information Withholding**: Information Withholding in short"));
        assert!(doc.contains("- **Vague Handoff**:"));

        let doc = router.route("tell me about alignment failures");
        assert!(doc.starts_with("# Alignment Failures"));
        assert!(doc.contains("- **Divergent Objectives**:"));
    }

    #[test]
    fn test_route_global_listings() {
        let store = test_store();
        let mut router = seeded_router(&store);

        let doc = router.route("please LIST ALL FAILURE MODES for me");
        assert!(doc.starts_with("# All Failure Modes"));
        assert!(doc.contains("## Communication Failures"));
        assert!(doc.contains("## Alignment Failures"));

        let doc = router.route("show all categories");
        assert!(doc.starts_with("# All Failure Mode Categories"));
        assert!(doc.contains("## Communication Failures"));
        assert!(doc.contains("information exchange between"));
    }

    #[test]
    fn test_route_unrecognized_falls_through_to_help() {
        let store = test_store();
        let mut router = seeded_router(&store);

        let doc = router.route("what is the weather today");
        assert!(doc.starts_with("# Multi-Agent Failure Educator Help"));
    }

    #[test]
    fn test_route_on_empty_store_is_help() {
        let store = TaxonomyStore::from_modes(Vec::new());
        let mut router = seeded_router(&store);

        let doc = router.route("explain communication failures");
        assert!(doc.starts_with("# Multi-Agent Failure Educator Help"));
    }

    #[test]
    fn test_demonstration_draw_is_seed_deterministic() {
        let store = test_store();

        let mut a = QueryRouter::with_rng(&store, StdRng::seed_from_u64(7));
        let mut b = QueryRouter::with_rng(&store, StdRng::seed_from_u64(7));

        let doc_a = a.route("information withholding");
        let doc_b = b.route("information withholding");
        assert_eq!(doc_a, doc_b);
        assert!(doc_a.contains("Information Withholding scenario"));
    }

    #[test]
    fn test_empty_scenarios_render_placeholder() {
        let mut bare = mode("Silent Drop", "Communication Failures");
        bare.example_scenarios.clear();
        let store = TaxonomyStore::from_modes(vec![bare]);
        let mut router = seeded_router(&store);

        let doc = router.route("silent drop");
        assert!(doc.contains("No demonstration scenarios available for Silent Drop."));
    }

    #[test]
    fn test_empty_structural_solutions_keep_subsection() {
        let mut m = mode("Lopsided Fix", "Communication Failures");
        m.structural_solutions.clear();
        let store = TaxonomyStore::from_modes(vec![m]);
        let mut router = seeded_router(&store);

        let doc = router.route("lopsided fix");
        assert!(doc.contains("### Structural Solutions"));
        // Subsection is present but carries zero bullets
        assert!(doc.trim_end().ends_with("### Structural Solutions"));
        assert!(doc.contains("### Tactical Solutions\n- Add a checklist"));
    }

    #[test]
    fn test_unknown_category_text_is_placeholder() {
        let store = TaxonomyStore::from_modes(vec![mode("Odd Mode", "Novel Failures")]);
        let router = seeded_router(&store);

        let doc = router.all_categories_document();
        assert!(doc.contains("No description available for Novel Failures."));
    }

    #[test]
    fn test_missing_text_fields_render_placeholders() {
        let m = FailureMode {
            name: "Hollow Mode".to_string(),
            category: "Communication Failures".to_string(),
            short_description: String::new(),
            description: String::new(),
            example_scenarios: Vec::new(),
            phd_level_analysis: String::new(),
            tactical_solutions: Vec::new(),
            structural_solutions: Vec::new(),
        };
        let store = TaxonomyStore::from_modes(vec![m]);
        let mut router = seeded_router(&store);

        let doc = router.route("hollow mode");
        assert!(doc.contains("## Definition\nNo description available."));
        assert!(doc.contains("No analysis available for Hollow Mode."));

        let listing = router.category_document("Communication Failures");
        assert!(listing.contains("- **Hollow Mode**: No description available.\n"));
    }
}
